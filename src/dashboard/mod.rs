//! Shared dashboard state: the five panes, their layout, and the log sink.
//!
//! Every pane sits behind its own mutex. Dispatcher callbacks write pane
//! content while the render loop reads it, and neither ever holds two pane
//! locks at once.

mod layout;
mod rules;
mod sink;

pub use layout::{compute_layout, PaneLayout};
pub use rules::{key_value_rules, log_rules, task_rules, FAILED_GLYPH, OK_GLYPH, QUEUED_GLYPH};
pub use sink::{format_log_line, LogLevel, LogSink, PaneLogSink};

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, Frame};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::lock_or_recover;
use crate::pane::{Palette, PaneConfig, PaneWidget, ProgressPane, Renderable, TextPane};
use crate::progress::ProgressTracker;
use crate::DashboardError;

/// Log lines kept for the log pane; older entries are dropped.
pub const LOG_HISTORY_MAX: usize = 5000;

pub const LOG_TITLE: &str = "Logs";
pub const PROGRESS_TITLE: &str = "Progress";
pub const STATS_TITLE: &str = "Stats";
pub const INFO_TITLE: &str = "Information";

#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Title of the task list pane.
    pub service_title: String,
    pub palette: Palette,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            service_title: "Service tasks".to_string(),
            palette: Palette::colored(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutChange {
    Unchanged,
    Rebuilt(PaneLayout),
}

pub struct Dashboard {
    log: Mutex<TextPane>,
    progress: Mutex<ProgressPane>,
    tasks: Mutex<TextPane>,
    stats: Mutex<TextPane>,
    info: Mutex<TextPane>,
    layout: Mutex<Option<((u16, u16), PaneLayout)>>,
    palette: Palette,
    running: AtomicBool,
}

impl Dashboard {
    /// Build the panes with empty geometry; the first [`sync_layout`]
    /// places them.
    ///
    /// [`sync_layout`]: Dashboard::sync_layout
    pub fn new(options: DashboardOptions) -> Result<Self, DashboardError> {
        let unplaced = Rect::default();
        let kv_rules = Arc::new(key_value_rules()?);
        Ok(Self {
            log: Mutex::new(
                TextPane::new(PaneConfig::new(LOG_TITLE, unplaced, Arc::new(log_rules()?)))
                    .with_history_limit(LOG_HISTORY_MAX),
            ),
            progress: Mutex::new(ProgressPane::new(PaneConfig::new(
                PROGRESS_TITLE,
                unplaced,
                Arc::new(Vec::new()),
            ))),
            tasks: Mutex::new(TextPane::new(PaneConfig::new(
                options.service_title,
                unplaced,
                Arc::new(task_rules()?),
            ))),
            stats: Mutex::new(TextPane::new(PaneConfig::new(
                STATS_TITLE,
                unplaced,
                Arc::clone(&kv_rules),
            ))),
            info: Mutex::new(TextPane::new(PaneConfig::new(
                INFO_TITLE, unplaced, kv_rules,
            ))),
            layout: Mutex::new(None),
            palette: options.palette,
            running: AtomicBool::new(true),
        })
    }

    /// Recreate the panes for a new terminal size, carrying their content
    /// over. Does nothing when the size matches the last call.
    pub fn sync_layout(&self, width: u16, height: u16) -> Result<LayoutChange, DashboardError> {
        let mut current = lock_or_recover(&self.layout, "dashboard layout");
        if let Some((size, _)) = *current {
            if size == (width, height) {
                return Ok(LayoutChange::Unchanged);
            }
        }
        let layout = compute_layout(width, height)?;
        {
            let mut pane = lock_or_recover(&self.log, "log pane");
            *pane = pane.relocated(layout.log);
        }
        {
            let mut pane = lock_or_recover(&self.progress, "progress pane");
            *pane = pane.relocated(layout.progress);
        }
        {
            let mut pane = lock_or_recover(&self.tasks, "task pane");
            *pane = pane.relocated(layout.tasks);
        }
        {
            let mut pane = lock_or_recover(&self.stats, "stats pane");
            *pane = pane.relocated(layout.stats);
        }
        {
            let mut pane = lock_or_recover(&self.info, "info pane");
            *pane = pane.relocated(layout.info);
        }
        *current = Some(((width, height), layout));
        tracing::debug!(width, height, "dashboard layout rebuilt");
        Ok(LayoutChange::Rebuilt(layout))
    }

    /// Lay out for the frame's size and paint every pane into it.
    pub fn render(&self, frame: &mut Frame<'_>) -> Result<LayoutChange, DashboardError> {
        let area = frame.size();
        let change = self.sync_layout(area.width, area.height)?;
        self.paint(frame.buffer_mut());
        Ok(change)
    }

    fn paint(&self, buf: &mut Buffer) {
        self.paint_pane(&*lock_or_recover(&self.log, "log pane"), buf);
        self.paint_pane(&*lock_or_recover(&self.progress, "progress pane"), buf);
        self.paint_pane(&*lock_or_recover(&self.tasks, "task pane"), buf);
        self.paint_pane(&*lock_or_recover(&self.stats, "stats pane"), buf);
        self.paint_pane(&*lock_or_recover(&self.info, "info pane"), buf);
    }

    fn paint_pane<P: Renderable>(&self, pane: &P, buf: &mut Buffer) {
        PaneWidget::new(pane, &self.palette).render(pane.config().geometry, buf);
    }

    pub fn layout(&self) -> Option<PaneLayout> {
        lock_or_recover(&self.layout, "dashboard layout").map(|(_, layout)| layout)
    }

    pub fn push_log_line(&self, line: impl Into<String>) {
        lock_or_recover(&self.log, "log pane").push_line(line);
    }

    /// Add a task row and return its slot index.
    pub fn push_task_row(&self, line: impl Into<String>) -> usize {
        lock_or_recover(&self.tasks, "task pane").push_line(line)
    }

    /// Rewrite the task row at `slot` (last write wins).
    pub fn set_task_row(&self, slot: usize, line: impl Into<String>) -> usize {
        lock_or_recover(&self.tasks, "task pane").set_line(slot, line)
    }

    pub fn set_progress(&self, finished: usize, total: usize) {
        lock_or_recover(&self.progress, "progress pane").update(finished, total);
    }

    pub fn progress(&self) -> ProgressTracker {
        lock_or_recover(&self.progress, "progress pane")
            .tracker()
            .clone()
    }

    pub fn set_stats(&self, lines: Vec<String>) {
        lock_or_recover(&self.stats, "stats pane").replace_lines(lines);
    }

    pub fn set_info(&self, lines: Vec<String>) {
        lock_or_recover(&self.info, "info pane").replace_lines(lines);
    }

    pub fn log_lines(&self) -> Vec<String> {
        lock_or_recover(&self.log, "log pane").lines().to_vec()
    }

    pub fn task_lines(&self) -> Vec<String> {
        lock_or_recover(&self.tasks, "task pane").lines().to_vec()
    }

    pub fn stats_lines(&self) -> Vec<String> {
        lock_or_recover(&self.stats, "stats pane").lines().to_vec()
    }

    pub fn info_lines(&self) -> Vec<String> {
        lock_or_recover(&self.info, "info pane").lines().to_vec()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the render loop to wind down at its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::test_support::buffer_line;
    use ratatui::{backend::TestBackend, Terminal};

    fn dashboard() -> Dashboard {
        Dashboard::new(DashboardOptions::default()).expect("dashboard")
    }

    #[test]
    fn same_size_is_a_no_op() {
        let dashboard = dashboard();
        assert!(matches!(
            dashboard.sync_layout(80, 24).expect("layout"),
            LayoutChange::Rebuilt(_)
        ));
        let before = dashboard.layout();
        assert_eq!(
            dashboard.sync_layout(80, 24).expect("layout"),
            LayoutChange::Unchanged
        );
        assert_eq!(dashboard.layout(), before);
    }

    #[test]
    fn resize_keeps_pane_content() {
        let dashboard = dashboard();
        dashboard.sync_layout(80, 24).expect("layout");
        dashboard.push_log_line("first");
        let slot = dashboard.push_task_row(" ~  files-0\t-");
        dashboard.set_progress(2, 5);

        let change = dashboard.sync_layout(120, 40).expect("layout");
        let LayoutChange::Rebuilt(layout) = change else {
            panic!("expected a rebuild");
        };
        assert_eq!(layout.log, Rect::new(0, 0, 72, 36));
        assert_eq!(dashboard.log_lines(), vec!["first".to_string()]);
        assert_eq!(dashboard.task_lines().len(), 1);
        assert_eq!(dashboard.set_task_row(slot, " ✔  files-0\tOK"), slot);
        assert_eq!(dashboard.progress().finished(), 2);
        assert_eq!(dashboard.progress().total(), 5);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(dashboard().sync_layout(0, 0).is_err());
    }

    #[test]
    fn render_paints_all_titles() {
        let dashboard = dashboard();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).expect("terminal");
        terminal
            .draw(|frame| {
                dashboard.render(frame).expect("render");
            })
            .expect("draw");
        let buffer = terminal.backend().buffer();
        let top = buffer_line(buffer, 0);
        assert!(top.contains(" Logs "));
        assert!(top.contains(" Service tasks "));
        let middle = buffer_line(buffer, 15);
        assert!(middle.contains(" Stats "));
        assert!(middle.contains(" Information "));
        assert!(buffer_line(buffer, 27).contains(" Progress - 0% "));
    }

    #[test]
    fn stop_clears_running_flag() {
        let dashboard = dashboard();
        assert!(dashboard.is_running());
        dashboard.stop();
        assert!(!dashboard.is_running());
    }
}
