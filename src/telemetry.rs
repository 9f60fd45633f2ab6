use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Modules that emit trace events, with the most verbose level kept for each.
const TRACE_TARGETS: [(&str, Level); 5] = [
    ("taskboard::dispatch", Level::DEBUG),
    ("taskboard::render_loop", Level::DEBUG),
    ("taskboard::dashboard", Level::DEBUG),
    ("taskboard::lock", Level::WARN),
    ("taskboard::app", Level::INFO),
];

/// Mirror of the log pane. Lines carry job labels and operation messages.
const LOG_SINK_TARGET: &str = "taskboard::dashboard::sink";

/// JSON-lines trace file; `TASKBOARD_TRACE_LOG` overrides the temp-dir default.
pub(crate) fn tracing_log_path() -> PathBuf {
    env::var("TASKBOARD_TRACE_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("taskboard_trace.jsonl"))
}

/// Per-module filter for the trace file. Log pane lines are only kept when
/// content logging is on; everything outside the crate is dropped.
pub(crate) fn trace_filter(log_content: bool) -> Targets {
    let targets = Targets::new().with_targets(TRACE_TARGETS);
    if log_content {
        targets.with_target(LOG_SINK_TARGET, Level::INFO)
    } else {
        targets.with_target(LOG_SINK_TARGET, LevelFilter::OFF)
    }
}

/// Route `tracing` events to the trace file. Stdout belongs to the
/// dashboard, so nothing is installed when file logging is off.
pub(crate) fn init_tracing(config: &AppConfig) {
    if !config.logging_enabled() {
        return;
    }

    TRACING_INIT.get_or_init(|| {
        let path = tracing_log_path();
        let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
            return;
        };
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_target(true)
            .with_thread_names(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_filter(trace_filter(config.log_content));
        let subscriber = tracing_subscriber::registry().with(layer);
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
