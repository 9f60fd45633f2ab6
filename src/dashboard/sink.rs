use chrono::Local;
use std::fmt;
use std::sync::Arc;

use super::Dashboard;
use crate::log_debug_content;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Keyword the log pane's color rules key on.
    pub fn keyword(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Destination for leveled, human-readable messages.
pub trait LogSink: Send + Sync {
    fn emit(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.emit(LogLevel::Error, message);
    }
}

/// Appends timestamped entries to the dashboard's log pane and mirrors them
/// to `tracing`.
pub struct PaneLogSink {
    dashboard: Arc<Dashboard>,
    source: String,
}

impl PaneLogSink {
    pub fn new(dashboard: Arc<Dashboard>, source: impl Into<String>) -> Self {
        Self {
            dashboard,
            source: source.into(),
        }
    }
}

impl LogSink for PaneLogSink {
    fn emit(&self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let line = format_log_line(&timestamp, &self.source, level, message);
        match level {
            LogLevel::Info => tracing::info!(source = %self.source, "{message}"),
            LogLevel::Warn => tracing::warn!(source = %self.source, "{message}"),
            LogLevel::Error => tracing::error!(source = %self.source, "{message}"),
        }
        log_debug_content(&line);
        self.dashboard.push_log_line(line);
    }
}

/// `"<timestamp> <source>/<level>| <message>"`
pub fn format_log_line(timestamp: &str, source: &str, level: LogLevel, message: &str) -> String {
    format!("{timestamp} {source}/{level}| {message}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardOptions;

    #[test]
    fn formats_source_and_level() {
        assert_eq!(
            format_log_line("12:00", "Requests", LogLevel::Error, "foo-3 404 Not Found"),
            "12:00 Requests/error| foo-3 404 Not Found"
        );
    }

    #[test]
    fn pane_sink_appends_to_log_pane() {
        let dashboard = Arc::new(Dashboard::new(DashboardOptions::default()).expect("dashboard"));
        let sink = PaneLogSink::new(Arc::clone(&dashboard), "Requests");
        sink.warn("Created 3 jobs");
        sink.error("files-3 404 Not Found");
        let lines = dashboard.log_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" Requests/warn| Created 3 jobs"));
        assert!(lines[1].contains("Requests/error| files-3"));
    }
}
