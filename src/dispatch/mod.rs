//! Bounded-concurrency dispatcher.
//!
//! A fixed pool of scoped worker threads pulls items off a shared queue, so
//! no more than `concurrency` operations ever run at once. Workers report
//! back over a channel and the calling thread hands completions to the
//! observer in the order they finish.

#[cfg(test)]
mod tests;
mod work_item;

pub use work_item::{WorkItem, WorkState};

use crossbeam_channel::unbounded;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread;

use crate::terminal_restore::quiet_panics;
use crate::DashboardError;

/// How a single work item gets done.
pub trait Operation: Sync {
    /// Perform the work for `label`. The `Ok` text and the error's display
    /// text both end up as the item's message.
    fn perform(&self, label: &str) -> anyhow::Result<String>;
}

impl<F> Operation for F
where
    F: Fn(&str) -> anyhow::Result<String> + Sync,
{
    fn perform(&self, label: &str) -> anyhow::Result<String> {
        self(label)
    }
}

/// Progress callbacks. `on_start` runs on a worker thread right before the
/// operation; `on_finish` runs on the dispatching thread in finish order.
pub trait DispatchObserver: Sync {
    /// Returns the UI slot the item should be tracked under, if any.
    fn on_start(&self, _item: &WorkItem) -> Option<usize> {
        None
    }

    /// The item arrives finished, with its slot, state and message set.
    fn on_finish(&self, _item: &WorkItem) {}
}

impl DispatchObserver for () {}

impl<T: DispatchObserver + ?Sized> DispatchObserver for &T {
    fn on_start(&self, item: &WorkItem) -> Option<usize> {
        (**self).on_start(item)
    }

    fn on_finish(&self, item: &WorkItem) {
        (**self).on_finish(item)
    }
}

/// Shared stop flag. Once set, workers stop taking queued items.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    concurrency: usize,
    cancel: CancelToken,
}

impl Dispatcher {
    pub fn new(concurrency: usize) -> Result<Self, DashboardError> {
        if concurrency < 1 {
            return Err(DashboardError::invalid(
                "concurrency must be at least 1",
            ));
        }
        Ok(Self {
            concurrency,
            cancel: CancelToken::new(),
        })
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run every item and return them finished, in completion order.
    ///
    /// Failures (including panics inside `operation`) are recorded on the
    /// item and never stop the other items. Blocks until all started items
    /// are done; after cancellation, items still queued are dropped.
    pub fn run<O, W>(&self, items: Vec<WorkItem>, operation: &O, observer: &W) -> Vec<WorkItem>
    where
        O: Operation + ?Sized,
        W: DispatchObserver + ?Sized,
    {
        let total = items.len();
        if total == 0 {
            return Vec::new();
        }
        let workers = self.concurrency.min(total);
        tracing::info!(total, workers, "dispatch started");

        let (queue_tx, queue_rx) = unbounded::<WorkItem>();
        for item in items {
            let _ = queue_tx.send(item);
        }
        drop(queue_tx);

        let (done_tx, done_rx) = unbounded::<WorkItem>();
        let mut finished = Vec::with_capacity(total);
        thread::scope(|scope| {
            for _ in 0..workers {
                let queue_rx = queue_rx.clone();
                let done_tx = done_tx.clone();
                let cancel = &self.cancel;
                scope.spawn(move || {
                    for mut item in queue_rx.iter() {
                        if cancel.is_cancelled() {
                            break;
                        }
                        item.mark_running();
                        let slot = observer.on_start(&item);
                        item.assign_slot(slot);
                        item.finish(perform_guarded(operation, item.label()));
                        if done_tx.send(item).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(done_tx);

            for item in done_rx.iter() {
                tracing::debug!(label = item.label(), state = ?item.state(), "item finished");
                observer.on_finish(&item);
                finished.push(item);
            }
        });

        tracing::info!(
            finished = finished.len(),
            cancelled = self.cancel.is_cancelled(),
            "dispatch ended"
        );
        finished
    }
}

fn perform_guarded<O: Operation + ?Sized>(operation: &O, label: &str) -> Result<String, String> {
    let outcome = quiet_panics(|| panic::catch_unwind(AssertUnwindSafe(|| operation.perform(label))));
    match outcome {
        Ok(Ok(message)) => Ok(message),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(payload) => Err(format!("internal failure: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
