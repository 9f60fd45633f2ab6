use super::*;
use anyhow::bail;
use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::Mutex;
use std::time::Duration;

fn labels(count: usize) -> Vec<WorkItem> {
    WorkItem::batch((0..count).map(|i| format!("files-{i}")))
}

/// Tracks how many operations overlap.
#[derive(Default)]
struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
    next_slot: AtomicUsize,
}

impl DispatchObserver for Recorder {
    fn on_start(&self, item: &WorkItem) -> Option<usize> {
        assert_eq!(item.state(), WorkState::Running);
        self.events
            .lock()
            .expect("events")
            .push(format!("start {}", item.label()));
        Some(self.next_slot.fetch_add(1, Ordering::SeqCst))
    }

    fn on_finish(&self, item: &WorkItem) {
        assert!(item.is_done());
        self.events
            .lock()
            .expect("events")
            .push(format!("finish {}", item.label()));
    }
}

#[test]
fn rejects_zero_concurrency() {
    assert!(matches!(
        Dispatcher::new(0),
        Err(DashboardError::InvalidConfiguration(_))
    ));
}

#[test]
fn never_exceeds_concurrency() {
    for concurrency in [1, 2, 4, 7] {
        let gauge = Gauge::default();
        let operation = |_: &str| -> anyhow::Result<String> {
            gauge.enter();
            thread::sleep(Duration::from_millis(5));
            gauge.leave();
            Ok("ok".into())
        };
        let dispatcher = Dispatcher::new(concurrency).expect("dispatcher");
        let results = dispatcher.run(labels(20), &operation, &());
        assert_eq!(results.len(), 20);
        let peak = gauge.peak.load(Ordering::SeqCst);
        assert!(peak <= concurrency, "peak {peak} > {concurrency}");
        assert!(peak >= 1);
    }
}

#[test]
fn returns_every_item_finished() {
    let operation = |label: &str| -> anyhow::Result<String> {
        if label.ends_with('3') || label.ends_with('9') {
            bail!("404 Not Found");
        }
        Ok("200 OK".into())
    };
    let dispatcher = Dispatcher::new(4).expect("dispatcher");
    let results = dispatcher.run(labels(10), &operation, &());

    assert_eq!(results.len(), 10);
    assert!(results.iter().all(WorkItem::is_done));
    let failed: HashSet<&str> = results
        .iter()
        .filter(|item| item.state() == WorkState::Failed)
        .map(WorkItem::label)
        .collect();
    assert_eq!(failed, HashSet::from(["files-3", "files-9"]));
    assert!(results
        .iter()
        .filter(|item| item.state() == WorkState::Failed)
        .all(|item| item.message() == "404 Not Found"));
}

#[test]
fn completions_arrive_in_finish_order() {
    // files-0 takes longest, so it cannot be reported first.
    let operation = |label: &str| -> anyhow::Result<String> {
        let delay = if label == "files-0" { 80 } else { 5 };
        thread::sleep(Duration::from_millis(delay));
        Ok(label.to_string())
    };
    let dispatcher = Dispatcher::new(3).expect("dispatcher");
    let results = dispatcher.run(labels(3), &operation, &());
    assert_eq!(results.last().map(WorkItem::label), Some("files-0"));
}

#[test]
fn start_precedes_finish_and_slots_stick() {
    let recorder = Recorder::default();
    let operation = |_: &str| -> anyhow::Result<String> { Ok("done".into()) };
    let dispatcher = Dispatcher::new(2).expect("dispatcher");
    let results = dispatcher.run(labels(6), &operation, &recorder);

    let events = recorder.events.lock().expect("events").clone();
    for item in &results {
        let start = events
            .iter()
            .position(|e| e == &format!("start {}", item.label()))
            .expect("start event");
        let finish = events
            .iter()
            .position(|e| e == &format!("finish {}", item.label()))
            .expect("finish event");
        assert!(start < finish);
    }
    let slots: HashSet<usize> = results.iter().filter_map(WorkItem::slot).collect();
    assert_eq!(slots.len(), 6);
}

#[test]
fn borrowed_observer_still_sees_every_item() {
    let recorder = Recorder::default();
    let borrowed = &recorder;
    let operation = |_: &str| -> anyhow::Result<String> { Ok("done".into()) };
    let dispatcher = Dispatcher::new(2).expect("dispatcher");
    let results = dispatcher.run(labels(3), &operation, &borrowed);

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|item| item.slot().is_some()));
    let events = recorder.events.lock().expect("events");
    assert_eq!(events.iter().filter(|e| e.starts_with("finish")).count(), 3);
}

#[test]
fn panicking_operation_becomes_failure() {
    let operation = |label: &str| -> anyhow::Result<String> {
        if label == "files-1" {
            panic!("exploded");
        }
        Ok("fine".into())
    };
    let dispatcher = Dispatcher::new(2).expect("dispatcher");
    let results = dispatcher.run(labels(4), &operation, &());
    assert_eq!(results.len(), 4);
    let broken = results
        .iter()
        .find(|item| item.label() == "files-1")
        .expect("files-1");
    assert_eq!(broken.state(), WorkState::Failed);
    assert_eq!(broken.message(), "internal failure: exploded");
    assert_eq!(
        results
            .iter()
            .filter(|item| item.state() == WorkState::Succeeded)
            .count(),
        3
    );
}

#[test]
fn empty_batch_returns_immediately() {
    let dispatcher = Dispatcher::new(4).expect("dispatcher");
    let operation = |_: &str| -> anyhow::Result<String> { Ok(String::new()) };
    assert!(dispatcher.run(Vec::new(), &operation, &()).is_empty());
}

#[test]
fn cancelled_dispatch_drops_queued_items() {
    let cancel = CancelToken::new();
    let started = AtomicUsize::new(0);
    let operation = |_: &str| -> anyhow::Result<String> {
        if started.fetch_add(1, Ordering::SeqCst) == 0 {
            cancel.cancel();
        }
        Ok("ok".into())
    };
    let dispatcher = Dispatcher::new(1)
        .expect("dispatcher")
        .with_cancel(cancel.clone());
    let results = dispatcher.run(labels(10), &operation, &());
    assert_eq!(results.len(), 1);
    assert!(dispatcher.cancel_token().is_cancelled());
}
