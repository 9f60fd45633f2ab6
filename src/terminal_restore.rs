use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    cell::Cell,
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        OnceLock,
    },
};

use crate::DashboardError;

static RAW_MODE_ENABLED: AtomicBool = AtomicBool::new(false);
static ALT_SCREEN_ENABLED: AtomicBool = AtomicBool::new(false);
static CURSOR_HIDDEN: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

/// RAII guard to restore terminal state on drop (and on panic via a shared hook).
pub struct TerminalRestoreGuard;

impl TerminalRestoreGuard {
    pub fn new() -> Self {
        install_terminal_panic_hook();
        TerminalRestoreGuard
    }

    pub fn enable_raw_mode(&self) -> io::Result<()> {
        enable_raw_mode()?;
        RAW_MODE_ENABLED.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn enter_alt_screen(&self, stdout: &mut impl Write) -> io::Result<()> {
        execute!(stdout, EnterAlternateScreen)?;
        ALT_SCREEN_ENABLED.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn hide_cursor(&self, stdout: &mut impl Write) -> io::Result<()> {
        execute!(stdout, Hide)?;
        CURSOR_HIDDEN.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn restore(&self) -> Result<(), DashboardError> {
        restore_terminal()
    }
}

impl Default for TerminalRestoreGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        report_teardown(restore_terminal());
    }
}

/// Undo whatever terminal modes were switched on. Safe to call any number
/// of times; steps already undone are skipped.
pub fn restore_terminal() -> Result<(), DashboardError> {
    let mut failures = Vec::new();
    if RAW_MODE_ENABLED.swap(false, Ordering::SeqCst) {
        if let Err(err) = disable_raw_mode() {
            failures.push(format!("raw mode: {err}"));
        }
    }
    let mut stdout = io::stdout();
    if ALT_SCREEN_ENABLED.swap(false, Ordering::SeqCst) {
        if let Err(err) = execute!(stdout, LeaveAlternateScreen) {
            failures.push(format!("alternate screen: {err}"));
        }
    }
    if CURSOR_HIDDEN.swap(false, Ordering::SeqCst) {
        if let Err(err) = execute!(stdout, Show) {
            failures.push(format!("cursor: {err}"));
        }
    }
    let _ = stdout.flush();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::TeardownFailure(failures.join("; ")))
    }
}

/// The terminal may be unusable at this point, so stderr is the last resort.
pub fn report_teardown(result: Result<(), DashboardError>) {
    if let Err(err) = result {
        crate::log_debug(&format!("{err}"));
        eprintln!("taskboard: {err}");
    }
}

/// Run `action` with the panic hook muted on this thread: panics are still
/// written to the crash log, but the terminal is left alone. For code that
/// catches its own panics.
pub fn quiet_panics<R>(action: impl FnOnce() -> R) -> R {
    let previous = QUIET_PANICS.with(|flag| flag.replace(true));
    let result = action();
    QUIET_PANICS.with(|flag| flag.set(previous));
    result
}

pub fn install_terminal_panic_hook() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if QUIET_PANICS.with(Cell::get) {
                crate::log_panic(info);
                return;
            }
            report_teardown(restore_terminal());
            crate::log_panic(info);
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            crate::log_debug(&format!("panic at {location}"));
            crate::log_debug_content(&format!("panic: {info}"));
            previous(info);
        }));
    });
}
