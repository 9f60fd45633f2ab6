use crate::text::{ColorRule, ColorToken};
use crate::DashboardError;

pub const QUEUED_GLYPH: &str = "~";
pub const OK_GLYPH: &str = "✔";
pub const FAILED_GLYPH: &str = "✘";

const CLOCK: &str = r"(\d{2}:\d{2}(?::\d{2})?)";

/// Log pane: error entries are red end to end, warn/info entries get a gray
/// timestamp and a colored `source/level|` tag.
pub fn log_rules() -> Result<Vec<ColorRule>, DashboardError> {
    Ok(vec![
        ColorRule::new(r"(.*/error\|.*)", &[ColorToken::Error])?,
        ColorRule::new(
            &format!(r"{CLOCK} (\S+/warn\|)"),
            &[ColorToken::Dim, ColorToken::Warn],
        )?,
        ColorRule::new(
            &format!(r"{CLOCK} (\S+/info\|)"),
            &[ColorToken::Dim, ColorToken::Info],
        )?,
    ])
}

/// Task list: only the status glyph is colored.
pub fn task_rules() -> Result<Vec<ColorRule>, DashboardError> {
    Ok(vec![
        ColorRule::new(&format!(r"\s*({QUEUED_GLYPH})"), &[ColorToken::Queued])?,
        ColorRule::new(&format!(r"\s*({OK_GLYPH})"), &[ColorToken::Ok])?,
        ColorRule::new(&format!(r"\s*({FAILED_GLYPH})"), &[ColorToken::Failed])?,
    ])
}

/// Stats and info panes: `Key:` prefixes are grayed out.
pub fn key_value_rules() -> Result<Vec<ColorRule>, DashboardError> {
    Ok(vec![ColorRule::new(r"([^:\t]+:)", &[ColorToken::Dim])?])
}
