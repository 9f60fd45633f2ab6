//! Dashboard session: dispatches a batch while the render loop paints it.

use anyhow::{Context, Result};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{AppConfig, DEFAULT_LOG_SOURCE};
use crate::dashboard::{
    Dashboard, DashboardOptions, LogSink, PaneLogSink, FAILED_GLYPH, OK_GLYPH, QUEUED_GLYPH,
};
use crate::dispatch::{CancelToken, DispatchObserver, Dispatcher, Operation, WorkItem, WorkState};
use crate::pane::Palette;
use crate::render_loop::{CrosstermInput, InputSource, LoopExit, RenderLoop};
use crate::terminal_restore::{report_teardown, TerminalRestoreGuard};
use crate::DashboardError;

/// Everything a session needs besides the terminal and the operation.
#[derive(Debug, Clone)]
pub struct SessionPlan {
    pub labels: Vec<String>,
    pub concurrency: usize,
    pub service: String,
    pub log_source: String,
    pub tick_interval: Duration,
    pub wait_for_key: bool,
    pub palette: Palette,
}

impl SessionPlan {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            labels: config.item_labels(),
            concurrency: config.concurrency,
            service: config.service.clone(),
            log_source: DEFAULT_LOG_SOURCE.to_string(),
            tick_interval: config.tick_interval(),
            wait_for_key: !config.no_wait,
            palette: if config.no_color {
                Palette::monochrome()
            } else {
                Palette::colored()
            },
        }
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            service_title: self.service.clone(),
            palette: self.palette,
        }
    }
}

#[derive(Debug)]
pub struct SessionReport {
    /// Finished items in completion order. After a cancellation only the
    /// items that were already in flight show up here.
    pub items: Vec<WorkItem>,
    pub total: usize,
    pub cancelled: bool,
    pub elapsed: Duration,
}

impl SessionReport {
    pub fn succeeded(&self) -> usize {
        self.count(WorkState::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(WorkState::Failed)
    }

    fn count(&self, state: WorkState) -> usize {
        self.items.iter().filter(|item| item.state() == state).count()
    }

    /// One-line summary printed once the terminal is back to normal.
    pub fn summary(&self) -> String {
        let outcome = if self.cancelled { "cancelled" } else { "done" };
        format!(
            "taskboard {outcome}: {} of {} jobs finished, {} ok, {} failed in {:.1}s",
            self.items.len(),
            self.total,
            self.succeeded(),
            self.failed(),
            self.elapsed.as_secs_f64()
        )
    }
}

fn task_row(glyph: &str, label: &str, detail: &str) -> String {
    format!(" {glyph}  {label}\t{detail}")
}

/// Mirrors dispatcher progress into the panes.
pub(crate) struct DashboardObserver<'a> {
    dashboard: &'a Dashboard,
    sink: &'a dyn LogSink,
    total: usize,
    concurrency: usize,
    service: &'a str,
    finished: AtomicUsize,
    failed: AtomicUsize,
}

impl<'a> DashboardObserver<'a> {
    pub(crate) fn new(
        dashboard: &'a Dashboard,
        sink: &'a dyn LogSink,
        total: usize,
        concurrency: usize,
        service: &'a str,
    ) -> Self {
        Self {
            dashboard,
            sink,
            total,
            concurrency,
            service,
            finished: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    /// Rewrite the stats and info panes from the current counters.
    pub(crate) fn refresh_panels(&self) {
        let finished = self.finished.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);
        self.dashboard.set_stats(vec![
            format!("Finished Jobs:\t{finished}"),
            format!("Failed Jobs:\t{failed}"),
            format!("In Queue:\t{}", self.total.saturating_sub(finished)),
            String::new(),
            format!("Service: {}", self.service),
            format!("Max threads:\t{}", self.concurrency),
        ]);

        let tracker = self.dashboard.progress();
        self.dashboard.set_info(vec![
            format!("Elapsed Time:\t{}s", tracker.elapsed_secs()),
            format!("Remaining:\t{}", tracker.remaining_label()),
            format!("Average:\t{:.2} items/s", tracker.rate()),
        ]);
    }
}

impl DispatchObserver for DashboardObserver<'_> {
    fn on_start(&self, item: &WorkItem) -> Option<usize> {
        Some(
            self.dashboard
                .push_task_row(task_row(QUEUED_GLYPH, item.label(), "-")),
        )
    }

    fn on_finish(&self, item: &WorkItem) {
        let row = if item.state() == WorkState::Succeeded {
            let detail = if item.message().is_empty() {
                "OK"
            } else {
                item.message()
            };
            task_row(OK_GLYPH, item.label(), detail)
        } else {
            self.failed.fetch_add(1, Ordering::SeqCst);
            self.sink
                .error(&format!("{} {}", item.label(), item.message()));
            task_row(FAILED_GLYPH, item.label(), item.message())
        };
        match item.slot() {
            Some(slot) => {
                self.dashboard.set_task_row(slot, row);
            }
            None => {
                self.dashboard.push_task_row(row);
            }
        }

        let finished = self.finished.fetch_add(1, Ordering::SeqCst) + 1;
        self.dashboard.set_progress(finished, self.total);
        self.refresh_panels();
    }
}

/// Run the batch on a dispatcher thread while `terminal` is repainted on
/// this one. `teardown` runs as soon as the render loop stops, before
/// waiting on any operation still in flight.
pub fn drive<B, I, O, T>(
    terminal: &mut Terminal<B>,
    dashboard: Arc<Dashboard>,
    plan: &SessionPlan,
    operation: &O,
    input: &mut I,
    teardown: T,
) -> Result<SessionReport, DashboardError>
where
    B: Backend,
    I: InputSource + ?Sized,
    O: Operation + ?Sized,
    T: FnOnce() -> Result<(), DashboardError>,
{
    let started = Instant::now();
    let cancel = CancelToken::new();
    let dispatcher = Dispatcher::new(plan.concurrency)?.with_cancel(cancel.clone());
    let mut render_loop = RenderLoop::new(plan.tick_interval, cancel)?;
    if !plan.wait_for_key {
        render_loop = render_loop.without_key_wait();
    }

    let total = plan.labels.len();
    let sink = PaneLogSink::new(Arc::clone(&dashboard), plan.log_source.clone());
    let observer =
        DashboardObserver::new(&dashboard, &sink, total, plan.concurrency, &plan.service);
    sink.info(&format!("Preparing {total} jobs"));
    let batch = WorkItem::batch(plan.labels.iter().cloned());
    dashboard.set_progress(0, total);
    observer.refresh_panels();
    sink.warn(&format!("Created {total} jobs, running..."));

    let (done_tx, done_rx) = crossbeam_channel::bounded::<Vec<WorkItem>>(1);
    let (exit, items) = thread::scope(|scope| {
        let (dispatcher, observer, sink) = (&dispatcher, &observer, &sink);
        scope.spawn(move || {
            let items = dispatcher.run(batch, operation, observer);
            let failed = items
                .iter()
                .filter(|item| item.state() == WorkState::Failed)
                .count();
            sink.info(&format!("Finished {} jobs ({failed} failed)", items.len()));
            let _ = done_tx.send(items);
        });

        let exit = render_loop.run(terminal, &dashboard, &done_rx, input);
        report_teardown(teardown());
        let items = match &exit {
            LoopExit::Completed(_) => Vec::new(),
            LoopExit::Cancelled => done_rx.recv().unwrap_or_default(),
        };
        (exit, items)
    });

    let (items, cancelled) = match exit {
        LoopExit::Completed(items) => (items, false),
        LoopExit::Cancelled => (items, true),
    };
    tracing::info!(total, finished = items.len(), cancelled, "session finished");
    Ok(SessionReport {
        items,
        total,
        cancelled,
        elapsed: started.elapsed(),
    })
}

/// Take over the real terminal for one dashboard session. The terminal is
/// restored on every exit path, panics included.
pub fn run_session<O>(config: &AppConfig, operation: &O) -> Result<SessionReport>
where
    O: Operation + ?Sized,
{
    let plan = SessionPlan::from_config(config);
    let dashboard = Arc::new(Dashboard::new(plan.dashboard_options())?);

    let guard = TerminalRestoreGuard::new();
    let mut stdout = io::stdout();
    guard.enable_raw_mode().context("failed to enable raw mode")?;
    guard
        .enter_alt_screen(&mut stdout)
        .context("failed to enter the alternate screen")?;
    guard
        .hide_cursor(&mut stdout)
        .context("failed to hide the cursor")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("failed to open the terminal")?;

    let report = drive(
        &mut terminal,
        dashboard,
        &plan,
        operation,
        &mut CrosstermInput,
        || guard.restore(),
    )?;
    crate::log_debug(&report.summary());
    Ok(report)
}
