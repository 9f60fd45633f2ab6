//! Fixed-interval repaint loop raced against dispatcher completion.
//!
//! The loop is generic over the ratatui backend and the input source so it
//! can be driven headless in tests. It never owns terminal modes; the
//! session's `TerminalRestoreGuard` restores them once the loop returns.

use crossbeam_channel::{never, select, tick, Receiver};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::Duration;

use crate::dashboard::{Dashboard, LayoutChange};
use crate::dispatch::{CancelToken, WorkItem};
use crate::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Starting,
    Ticking,
    Stopping,
    Stopped,
}

#[derive(Debug)]
pub enum LoopExit {
    /// Every item finished; carries them in completion order.
    Completed(Vec<WorkItem>),
    /// Interrupted from outside before the dispatcher was done.
    Cancelled,
}

impl LoopExit {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoopExit::Cancelled)
    }
}

/// Keyboard access for the loop.
pub trait InputSource {
    /// Non-blocking; `true` when the user asked to quit.
    fn poll_interrupt(&mut self) -> io::Result<bool>;

    /// Block until any key is pressed.
    fn wait_for_key(&mut self) -> io::Result<()>;
}

/// Reads crossterm events. Raw mode swallows SIGINT, so Ctrl-C shows up
/// here as a key press.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn poll_interrupt(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(());
                }
            }
        }
    }
}

/// Input that never interrupts and never waits.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll_interrupt(&mut self) -> io::Result<bool> {
        Ok(false)
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct RenderLoop {
    tick_interval: Duration,
    wait_for_key: bool,
    cancel: CancelToken,
    interrupt: Option<Receiver<()>>,
    phase: RenderPhase,
    frames: u64,
    render_failures: u64,
}

impl RenderLoop {
    pub fn new(tick_interval: Duration, cancel: CancelToken) -> Result<Self, DashboardError> {
        if tick_interval.is_zero() {
            return Err(DashboardError::invalid("tick interval must be non-zero"));
        }
        Ok(Self {
            tick_interval,
            wait_for_key: true,
            cancel,
            interrupt: None,
            phase: RenderPhase::Starting,
            frames: 0,
            render_failures: 0,
        })
    }

    /// Skip the key-press acknowledgment after the final repaint.
    pub fn without_key_wait(mut self) -> Self {
        self.wait_for_key = false;
        self
    }

    /// Extra cancellation source; any message (or disconnect) stops the loop.
    pub fn with_interrupt(mut self, interrupt: Receiver<()>) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Frames successfully drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn render_failures(&self) -> u64 {
        self.render_failures
    }

    /// Tick until `done` delivers the finished batch or the run is
    /// interrupted, then repaint once more and optionally wait for a key.
    ///
    /// A disconnected `done` channel counts as a cancellation. On
    /// cancellation the dispatcher's token is set so queued items are
    /// abandoned.
    pub fn run<B, I>(
        &mut self,
        terminal: &mut Terminal<B>,
        dashboard: &Dashboard,
        done: &Receiver<Vec<WorkItem>>,
        input: &mut I,
    ) -> LoopExit
    where
        B: Backend,
        I: InputSource + ?Sized,
    {
        self.phase = RenderPhase::Starting;
        self.repaint(terminal, dashboard);
        self.phase = RenderPhase::Ticking;
        tracing::debug!(tick_ms = self.tick_interval.as_millis() as u64, "render loop ticking");

        let ticker = tick(self.tick_interval);
        let interrupt = self.interrupt.clone().unwrap_or_else(never);
        let exit = loop {
            select! {
                recv(done) -> finished => {
                    break match finished {
                        Ok(items) => LoopExit::Completed(items),
                        Err(_) => LoopExit::Cancelled,
                    };
                }
                recv(interrupt) -> _ => break LoopExit::Cancelled,
                recv(ticker) -> _ => {
                    if !dashboard.is_running() || self.cancel.is_cancelled() {
                        break LoopExit::Cancelled;
                    }
                    match input.poll_interrupt() {
                        Ok(true) => break LoopExit::Cancelled,
                        Ok(false) => {}
                        Err(err) => tracing::warn!(error = %err, "input poll failed"),
                    }
                    self.repaint(terminal, dashboard);
                }
            }
        };

        self.phase = RenderPhase::Stopping;
        if exit.is_cancelled() {
            self.cancel.cancel();
        }
        self.repaint(terminal, dashboard);
        if self.wait_for_key && !exit.is_cancelled() {
            if let Err(err) = input.wait_for_key() {
                tracing::warn!(error = %err, "key wait failed");
            }
        }
        dashboard.stop();
        self.phase = RenderPhase::Stopped;
        tracing::info!(
            frames = self.frames,
            render_failures = self.render_failures,
            cancelled = exit.is_cancelled(),
            "render loop stopped"
        );
        exit
    }

    /// Draw one frame. Failures skip the frame and never end the loop.
    fn repaint<B: Backend>(&mut self, terminal: &mut Terminal<B>, dashboard: &Dashboard) {
        let mut painted: Result<LayoutChange, DashboardError> = Ok(LayoutChange::Unchanged);
        let drawn = terminal.draw(|frame| painted = dashboard.render(frame));
        let outcome = match (drawn, painted) {
            (Err(err), _) => Err(DashboardError::RenderFailure(err.to_string())),
            (Ok(_), Err(err)) => Err(err),
            (Ok(_), Ok(_)) => Ok(()),
        };
        match outcome {
            Ok(()) => self.frames += 1,
            Err(err) => {
                self.render_failures += 1;
                tracing::warn!(error = %err, "frame skipped");
                crate::log_debug(&format!("frame skipped: {err}"));
            }
        }
    }
}
