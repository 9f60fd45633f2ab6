use crate::config::AppConfig;
use chrono::Local;
use std::{
    env, fs,
    io::Write,
    panic,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
};

const LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
const CRASH_LOG_MAX_BYTES: u64 = 256 * 1024;
static LOG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_CONTENT_ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOG: OnceLock<Mutex<Option<CappedFile>>> = OnceLock::new();

/// Debug log in the temp dir; capped and truncated in place when full.
pub fn log_file_path() -> PathBuf {
    env::temp_dir().join("taskboard.log")
}

/// Crash log written by the panic hook (location only unless content logging is on).
pub fn crash_log_path() -> PathBuf {
    env::temp_dir().join("taskboard_crash.log")
}

/// Append-only file that starts over once it would grow past `max_bytes`.
struct CappedFile {
    path: PathBuf,
    file: fs::File,
    max_bytes: u64,
    bytes_written: u64,
}

impl CappedFile {
    fn open(path: PathBuf, max_bytes: u64) -> Option<Self> {
        let existing = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let (file, bytes_written) = if existing > max_bytes {
            (Self::truncate(&path)?, 0)
        } else {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()?;
            (file, existing)
        };
        Some(Self {
            path,
            file,
            max_bytes,
            bytes_written,
        })
    }

    fn truncate(path: &PathBuf) -> Option<fs::File> {
        fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .ok()
    }

    fn write_line(&mut self, line: &str) {
        if self.bytes_written.saturating_add(line.len() as u64) > self.max_bytes {
            if let Some(file) = Self::truncate(&self.path) {
                self.file = file;
                self.bytes_written = 0;
            }
        }
        if self.file.write_all(line.as_bytes()).is_ok() {
            self.bytes_written = self.bytes_written.saturating_add(line.len() as u64);
        }
    }
}

fn debug_log() -> &'static Mutex<Option<CappedFile>> {
    DEBUG_LOG.get_or_init(|| Mutex::new(None))
}

fn set_logging(enabled: bool, content_enabled: bool) {
    LOG_ENABLED.store(enabled, Ordering::Relaxed);
    LOG_CONTENT_ENABLED.store(enabled && content_enabled, Ordering::Relaxed);
    let mut writer = debug_log()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *writer = if enabled {
        CappedFile::open(log_file_path(), LOG_MAX_BYTES)
    } else {
        None
    };
}

/// Configure file logging (debug log, crash log, tracing) from CLI flags or environment.
pub fn init_logging(config: &AppConfig) {
    set_logging(config.logging_enabled(), config.log_content);
    crate::telemetry::init_tracing(config);
}

fn stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Write debug messages to a temp file; the dashboard owns stdout.
pub fn log_debug(msg: &str) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let line = format!("[{}] {msg}\n", stamp());
    let mut writer = debug_log()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(writer) = writer.as_mut() {
        writer.write_line(&line);
    }
}

/// Write logs that may contain job labels or operation messages.
pub fn log_debug_content(msg: &str) {
    if LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        log_debug(msg);
    }
}

/// Record a panic in the crash log, omitting the payload unless content logging is on.
pub fn log_panic(info: &panic::PanicHookInfo<'_>) {
    if !LOG_ENABLED.load(Ordering::Relaxed) {
        return;
    }

    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown".to_string());
    let payload = if LOG_CONTENT_ENABLED.load(Ordering::Relaxed) {
        info.payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string())
    } else {
        "payload omitted (log-content disabled)".to_string()
    };

    let line = format!(
        "[{}] panic at {location}: {payload} (v{})\n",
        stamp(),
        env!("CARGO_PKG_VERSION")
    );
    if let Some(mut crash_log) = CappedFile::open(crash_log_path(), CRASH_LOG_MAX_BYTES) {
        crash_log.write_line(&line);
    }
}

#[cfg(test)]
pub(crate) fn set_logging_for_tests(enabled: bool, content_enabled: bool) {
    set_logging(enabled, content_enabled);
}
