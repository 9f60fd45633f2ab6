//! Line colorization and word wrapping for text panes.
//!
//! A line goes through [`match_line`] to become colored word segments, then
//! through [`reflow`] to become rows that fit the pane width.

mod color_rule;
mod wrap;

pub use color_rule::{match_line, ColorRule};
pub use wrap::{reflow, row_width, Row, CONTINUATION_MARKER, WRAP_MARGIN};

/// One entry of the fixed 8-slot palette. `Plain` (0) means "no color".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ColorToken {
    #[default]
    Plain = 0,
    /// Progress bar fill.
    Loading = 1,
    Warn = 2,
    Error = 3,
    Info = 4,
    /// "In queue" marker in the task list.
    Queued = 5,
    /// Success marker in the task list.
    Ok = 6,
    /// Failure marker in the task list.
    Failed = 7,
    /// Gray secondary text.
    Dim = 8,
}

impl ColorToken {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A piece of text with the color it should be painted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub color: ColorToken,
}

impl Segment {
    pub fn new(text: impl Into<String>, color: ColorToken) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, ColorToken::Plain)
    }
}
