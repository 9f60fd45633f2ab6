//! Simulated work source: every job sleeps for a while, then succeeds or
//! fails depending on its label.

use anyhow::bail;
use std::thread;
use std::time::Duration;
use taskboard::config::AppConfig;
use taskboard::Operation;

pub(crate) struct DemoOperation {
    min_delay_ms: u64,
    max_delay_ms: u64,
    fail_suffixes: Vec<String>,
}

impl DemoOperation {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            min_delay_ms: config.min_delay_ms,
            max_delay_ms: config.max_delay_ms.max(config.min_delay_ms),
            fail_suffixes: config.fail_suffixes.clone(),
        }
    }

    /// Same label, same delay; spread across `[min, max]`.
    fn delay_for(&self, label: &str) -> Duration {
        let span = self.max_delay_ms - self.min_delay_ms;
        let hash = label
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |acc, byte| {
                (acc ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
            });
        Duration::from_millis(self.min_delay_ms + hash % (span + 1))
    }

    fn fails(&self, label: &str) -> bool {
        self.fail_suffixes
            .iter()
            .any(|suffix| label.ends_with(suffix.as_str()))
    }
}

impl Operation for DemoOperation {
    fn perform(&self, label: &str) -> anyhow::Result<String> {
        thread::sleep(self.delay_for(label));
        if self.fails(label) {
            bail!("404 Not Found");
        }
        Ok("200 OK".to_string())
    }
}
