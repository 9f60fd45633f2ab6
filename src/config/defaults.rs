pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_ITEMS: usize = 10;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 1700;
pub const DEFAULT_NAME: &str = "files";
pub const DEFAULT_SERVICE: &str = "Service tasks";
pub const DEFAULT_LOG_SOURCE: &str = "Requests";

pub(super) const MAX_CONCURRENCY: usize = 256;
pub(super) const MAX_ITEMS: usize = 10_000;
pub(super) const MIN_TICK_MS: u64 = 10;
pub(super) const MAX_TICK_MS: u64 = 2_000;
pub(super) const MAX_DELAY_MS: u64 = 60_000;
pub(super) const MAX_LABEL_BYTES: usize = 64;

pub(super) fn default_fail_suffixes() -> Vec<String> {
    vec!["3".to_string(), "9".to_string()]
}
