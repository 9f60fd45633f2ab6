//! Taskboard entrypoint: runs a batch of simulated jobs behind the live
//! dashboard, then prints a summary once the terminal is restored.

mod demo;

use anyhow::Result;
use std::process::ExitCode;
use taskboard::config::AppConfig;
use taskboard::{init_logging, log_debug, log_file_path, run_session};

use crate::demo::DemoOperation;

fn main() -> Result<ExitCode> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    if config.logging_enabled() {
        log_debug(&format!(
            "taskboard {} starting: {} jobs, concurrency {}",
            env!("CARGO_PKG_VERSION"),
            config.items,
            config.concurrency
        ));
    }

    let operation = DemoOperation::from_config(&config);
    let report = run_session(&config, &operation)?;

    println!("{}", report.summary());
    for failure in report.items.iter().filter_map(|item| item.failure()) {
        println!("  {failure}");
    }
    if config.logging_enabled() {
        println!("debug log: {}", log_file_path().display());
    }

    Ok(if report.cancelled {
        ExitCode::from(130)
    } else {
        ExitCode::SUCCESS
    })
}
