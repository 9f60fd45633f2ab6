use ratatui::layout::Rect;

use super::{PaneConfig, Renderable};
use crate::text::{match_line, reflow, Row};

/// A pane of text lines, newest at the bottom.
///
/// Lines are append-only, except that any existing index may be rewritten
/// in place; that is how task rows change status.
#[derive(Debug, Clone)]
pub struct TextPane {
    config: PaneConfig,
    lines: Vec<String>,
    history_limit: Option<usize>,
}

impl TextPane {
    pub fn new(config: PaneConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
            history_limit: None,
        }
    }

    /// Keep at most `limit` lines, dropping the oldest. Only meant for panes
    /// that are never addressed by index.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit.max(1));
        self.trim_history();
        self
    }

    /// Rebuild this pane at a new position, taking its content along.
    pub fn relocated(&mut self, geometry: Rect) -> Self {
        Self {
            config: self.config.with_geometry(geometry),
            lines: std::mem::take(&mut self.lines),
            history_limit: self.history_limit,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append a line and return its index.
    pub fn push_line(&mut self, line: impl Into<String>) -> usize {
        self.lines.push(line.into());
        self.trim_history();
        self.lines.len() - 1
    }

    /// Overwrite the line at `index`; appends when the index does not exist
    /// yet. Returns the index the line ended up at.
    pub fn set_line(&mut self, index: usize, line: impl Into<String>) -> usize {
        match self.lines.get_mut(index) {
            Some(slot) => {
                *slot = line.into();
                index
            }
            None => self.push_line(line),
        }
    }

    /// Swap in a whole new set of lines.
    pub fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.trim_history();
    }

    fn trim_history(&mut self) {
        if let Some(limit) = self.history_limit {
            if self.lines.len() > limit {
                let excess = self.lines.len() - limit;
                self.lines.drain(..excess);
            }
        }
    }
}

impl Renderable for TextPane {
    fn config(&self) -> &PaneConfig {
        &self.config
    }

    /// Wrap lines newest first until the pane is full, so the latest
    /// content is always on screen and older lines fall off the top.
    fn reflow(&self) -> Vec<Row> {
        let visible = self.config.visible_rows();
        if visible == 0 {
            return Vec::new();
        }
        let max_width = self.config.inner_width();

        let mut chunks: Vec<Vec<Row>> = Vec::new();
        let mut produced = 0usize;
        for line in self.lines.iter().rev() {
            let rows = reflow(&match_line(line, &self.config.rules), max_width);
            produced += rows.len();
            chunks.push(rows);
            if produced >= visible {
                break;
            }
        }

        let mut rows: Vec<Row> = chunks.into_iter().rev().flatten().collect();
        let overflow = rows.len().saturating_sub(visible);
        rows.drain(..overflow);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{row_width, ColorRule, ColorToken, CONTINUATION_MARKER};
    use std::sync::Arc;

    fn pane(width: u16, height: u16) -> TextPane {
        TextPane::new(PaneConfig::new(
            "Logs",
            Rect::new(0, 0, width, height),
            Arc::new(Vec::new()),
        ))
    }

    fn first_words(rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|row| row.first().map(|s| s.text.clone()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn visible_rows_never_exceed_height_minus_border() {
        let mut pane = pane(40, 6);
        for i in 0..20 {
            pane.push_line(format!("line-{i}"));
        }
        let rows = pane.reflow();
        assert_eq!(rows.len(), 4);
        assert_eq!(first_words(&rows), vec!["line-16", "line-17", "line-18", "line-19"]);
        assert_eq!(pane.lines().len(), 20);
    }

    #[test]
    fn newest_wrapped_line_stays_visible() {
        let mut pane = pane(20, 5);
        pane.push_line("old");
        pane.push_line("aaaa bbbb cccc dddd eeee ffff");
        let rows = pane.reflow();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().skip(1).all(|row| row[0].text.starts_with(CONTINUATION_MARKER)));
        for row in &rows {
            assert!(row_width(row) <= 18);
        }
    }

    #[test]
    fn set_line_overwrites_in_place() {
        let mut pane = pane(40, 10);
        let first = pane.push_line("a");
        let second = pane.push_line("b");
        assert_eq!(pane.set_line(first, "a2"), first);
        assert_eq!(pane.lines(), ["a2", "b"]);
        assert_eq!(second, 1);
        assert_eq!(pane.set_line(9, "c"), 2);
    }

    #[test]
    fn history_limit_drops_oldest() {
        let mut pane = pane(40, 10).with_history_limit(3);
        for i in 0..5 {
            pane.push_line(i.to_string());
        }
        assert_eq!(pane.lines(), ["2", "3", "4"]);
    }

    #[test]
    fn relocated_pane_keeps_lines() {
        let mut pane = pane(40, 10);
        pane.push_line("keep me");
        let moved = pane.relocated(Rect::new(5, 5, 60, 20));
        assert_eq!(moved.lines(), ["keep me"]);
        assert_eq!(moved.config().geometry, Rect::new(5, 5, 60, 20));
    }

    #[test]
    fn rules_color_rows() {
        let rules = vec![ColorRule::new(r"\s*(✘)", &[ColorToken::Failed]).expect("rule")];
        let mut pane = TextPane::new(PaneConfig::new(
            "Tasks",
            Rect::new(0, 0, 40, 4),
            Arc::new(rules),
        ));
        pane.push_line(" ✘  files-3\t404 Not Found");
        let rows = pane.reflow();
        assert_eq!(rows[0][0].color, ColorToken::Failed);
        assert_eq!(rows[0][1].color, ColorToken::Plain);
    }

    #[test]
    fn flat_pane_renders_nothing() {
        let mut pane = pane(40, 2);
        pane.push_line("hidden");
        assert!(pane.reflow().is_empty());
    }
}
