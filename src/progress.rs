//! Progress and rate tracking.
//!
//! Rates are items per second. The remaining time estimate is derived from
//! that rate and left empty until at least one item finished.

use std::time::Instant;

/// Counters plus the timing stats derived from them.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    started_at: Instant,
    finished: usize,
    total: usize,
    elapsed_secs: u64,
    rate: f64,
    remaining_secs: Option<u64>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started_at: Instant) -> Self {
        Self {
            started_at,
            finished: 0,
            total: 0,
            elapsed_secs: 0,
            rate: 0.0,
            remaining_secs: None,
        }
    }

    /// Record new counters and refresh the derived stats.
    pub fn update(&mut self, finished: usize, total: usize) {
        self.update_at(finished, total, Instant::now());
    }

    /// Same as [`update`](Self::update) with an explicit clock reading.
    /// `finished` is clamped to `total`.
    pub fn update_at(&mut self, finished: usize, total: usize, now: Instant) {
        self.total = total;
        self.finished = finished.min(total);
        self.elapsed_secs = now.saturating_duration_since(self.started_at).as_secs();
        self.rate = if self.finished > 0 && self.elapsed_secs > 0 {
            round2(self.finished as f64 / self.elapsed_secs as f64)
        } else {
            0.0
        };
        self.remaining_secs = if self.rate > 0.0 {
            Some(((self.total - self.finished) as f64 / self.rate).round() as u64)
        } else {
            None
        };
    }

    pub fn finished(&self) -> usize {
        self.finished
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Items per second, rounded to two decimals.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.remaining_secs
    }

    /// Completed fraction in `0.0..=1.0`; zero when there is nothing to do.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.finished as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).floor() as u32
    }

    pub fn remaining_label(&self) -> String {
        match self.remaining_secs {
            Some(secs) => format!("{secs}s"),
            None => "--".to_string(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
