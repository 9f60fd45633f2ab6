//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::{ArgAction, Parser};
use std::time::Duration;

pub use defaults::{
    DEFAULT_CONCURRENCY, DEFAULT_ITEMS, DEFAULT_LOG_SOURCE, DEFAULT_MAX_DELAY_MS,
    DEFAULT_MIN_DELAY_MS, DEFAULT_NAME, DEFAULT_SERVICE, DEFAULT_TICK_MS,
};

/// CLI options for the taskboard dashboard. Validated before the terminal
/// is touched so bad values never leave it in raw mode.
#[derive(Debug, Parser, Clone)]
#[command(about = "Taskboard live task dashboard", author, version)]
pub struct AppConfig {
    /// Maximum number of jobs running at the same time
    #[arg(long, short = 'c', default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Number of demo jobs to dispatch
    #[arg(long, short = 'n', default_value_t = DEFAULT_ITEMS)]
    pub items: usize,

    /// Label prefix for demo jobs (labels are NAME-0, NAME-1, ...)
    #[arg(long, default_value = DEFAULT_NAME)]
    pub name: String,

    /// Title of the task list pane
    #[arg(long, default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// Demo jobs whose label ends with this suffix fail (repeatable)
    #[arg(
        long = "fail-suffix",
        action = ArgAction::Append,
        value_name = "SUFFIX",
        default_values_t = defaults::default_fail_suffixes()
    )]
    pub fail_suffixes: Vec<String>,

    /// Shortest simulated job duration (milliseconds)
    #[arg(long = "min-delay-ms", default_value_t = DEFAULT_MIN_DELAY_MS)]
    pub min_delay_ms: u64,

    /// Longest simulated job duration (milliseconds)
    #[arg(long = "max-delay-ms", default_value_t = DEFAULT_MAX_DELAY_MS)]
    pub max_delay_ms: u64,

    /// Dashboard refresh interval (milliseconds)
    #[arg(long = "tick-ms", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Render without colors
    #[arg(long = "no-color", default_value_t = false)]
    pub no_color: bool,

    /// Exit as soon as all jobs finish instead of waiting for a key press
    #[arg(long = "no-wait", default_value_t = false)]
    pub no_wait: bool,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "TASKBOARD_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "TASKBOARD_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging job labels and messages (debug log only)
    #[arg(
        long = "log-content",
        env = "TASKBOARD_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

impl AppConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }

    /// Demo job labels, `NAME-0` through `NAME-(items-1)`.
    pub fn item_labels(&self) -> Vec<String> {
        (0..self.items).map(|i| format!("{}-{i}", self.name)).collect()
    }
}
