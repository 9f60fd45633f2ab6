use super::validation::sanitize_label;
use super::AppConfig;
use clap::Parser;
use std::time::Duration;

#[test]
fn defaults_validate() {
    let mut cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.concurrency, 4);
    assert_eq!(cfg.items, 10);
    assert_eq!(cfg.fail_suffixes, vec!["3".to_string(), "9".to_string()]);
    assert_eq!(cfg.tick_interval(), Duration::from_millis(100));
}

#[test]
fn rejects_zero_concurrency() {
    let mut cfg = AppConfig::parse_from(["test-app", "--concurrency", "0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_concurrency_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "-c", "1"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "-c", "256"]);
    assert!(cfg.validate().is_ok());
    let mut cfg = AppConfig::parse_from(["test-app", "-c", "257"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_items_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--items", "0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--items", "10001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_tick_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--tick-ms", "5"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--tick-ms", "2001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_inverted_delays() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "--min-delay-ms",
        "500",
        "--max-delay-ms",
        "100",
    ]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_huge_delay() {
    let mut cfg = AppConfig::parse_from(["test-app", "--max-delay-ms", "60001"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn fail_suffix_flag_replaces_defaults() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "--fail-suffix",
        "1",
        "--fail-suffix",
        " 7 ",
        "--fail-suffix",
        "  ",
    ]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.fail_suffixes, vec!["1".to_string(), "7".to_string()]);
}

#[test]
fn item_labels_use_name_prefix() {
    let mut cfg = AppConfig::parse_from(["test-app", "--name", " urls ", "--items", "3"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.item_labels(), vec!["urls-0", "urls-1", "urls-2"]);
}

#[test]
fn logging_flags_combine() {
    let cfg = AppConfig::parse_from(["test-app", "--logs"]);
    assert!(cfg.logging_enabled());
    let cfg = AppConfig::parse_from(["test-app", "--logs", "--no-logs"]);
    assert!(!cfg.logging_enabled());
}

#[test]
fn sanitize_label_rejects_bad_input() {
    assert!(sanitize_label("", "--name").is_err());
    assert!(sanitize_label("a\nb", "--name").is_err());
    assert!(sanitize_label(&"x".repeat(65), "--name").is_err());
    assert_eq!(sanitize_label("  ok ", "--name").expect("label"), "ok");
}
