use super::defaults::{
    MAX_CONCURRENCY, MAX_DELAY_MS, MAX_ITEMS, MAX_LABEL_BYTES, MAX_TICK_MS, MIN_TICK_MS,
};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize text fields.
    pub fn validate(&mut self) -> Result<()> {
        if !(1..=MAX_CONCURRENCY).contains(&self.concurrency) {
            bail!(
                "--concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                self.concurrency
            );
        }
        if !(1..=MAX_ITEMS).contains(&self.items) {
            bail!(
                "--items must be between 1 and {MAX_ITEMS}, got {}",
                self.items
            );
        }
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&self.tick_ms) {
            bail!(
                "--tick-ms must be between {MIN_TICK_MS} and {MAX_TICK_MS}, got {}",
                self.tick_ms
            );
        }
        if self.max_delay_ms > MAX_DELAY_MS {
            bail!(
                "--max-delay-ms must be at most {MAX_DELAY_MS}, got {}",
                self.max_delay_ms
            );
        }
        if self.min_delay_ms > self.max_delay_ms {
            bail!(
                "--min-delay-ms ({}) cannot exceed --max-delay-ms ({})",
                self.min_delay_ms,
                self.max_delay_ms
            );
        }

        self.name = sanitize_label(&self.name, "--name")?;
        self.service = sanitize_label(&self.service, "--service")?;
        self.fail_suffixes.retain(|suffix| !suffix.trim().is_empty());
        for suffix in &mut self.fail_suffixes {
            *suffix = suffix.trim().to_string();
        }
        Ok(())
    }
}

/// Labels end up inside pane rows, so keep them short and single-line.
pub(super) fn sanitize_label(raw: &str, flag: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("{flag} cannot be empty");
    }
    if trimmed.len() > MAX_LABEL_BYTES {
        bail!("{flag} must be at most {MAX_LABEL_BYTES} bytes");
    }
    if trimmed.chars().any(char::is_control) {
        bail!("{flag} cannot contain control characters");
    }
    Ok(trimmed.to_string())
}
