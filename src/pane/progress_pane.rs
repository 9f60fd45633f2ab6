use ratatui::layout::Rect;

use super::{PaneConfig, Renderable};
use crate::progress::ProgressTracker;
use crate::text::{ColorToken, Row, Segment};

/// A progress bar spanning the pane, titled with the completed percentage.
#[derive(Debug, Clone)]
pub struct ProgressPane {
    config: PaneConfig,
    tracker: ProgressTracker,
}

impl ProgressPane {
    pub fn new(config: PaneConfig) -> Self {
        Self {
            config,
            tracker: ProgressTracker::new(),
        }
    }

    pub fn with_tracker(config: PaneConfig, tracker: ProgressTracker) -> Self {
        Self { config, tracker }
    }

    /// Rebuild this pane at a new position, keeping counters and start time.
    pub fn relocated(&self, geometry: Rect) -> Self {
        Self::with_tracker(self.config.with_geometry(geometry), self.tracker.clone())
    }

    pub fn update(&mut self, finished: usize, total: usize) {
        self.tracker.update(finished, total);
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Columns of the bar that are filled.
    pub fn filled_width(&self) -> usize {
        (self.config.inner_width() as f64 * self.tracker.fraction()).floor() as usize
    }
}

impl Renderable for ProgressPane {
    fn config(&self) -> &PaneConfig {
        &self.config
    }

    fn title(&self) -> String {
        format!("{} - {}%", self.config.title, self.tracker.percent())
    }

    fn reflow(&self) -> Vec<Row> {
        let filled = self.filled_width();
        (0..self.config.visible_rows())
            .map(|_| {
                if filled == 0 {
                    Vec::new()
                } else {
                    vec![Segment::new(" ".repeat(filled), ColorToken::Loading)]
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pane::test_support::buffer_line;
    use crate::pane::{Palette, PaneWidget};
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;
    use ratatui::widgets::Widget;
    use std::sync::Arc;

    fn pane(width: u16, height: u16) -> ProgressPane {
        ProgressPane::new(PaneConfig::new(
            "Progress",
            Rect::new(0, 0, width, height),
            Arc::new(Vec::new()),
        ))
    }

    #[test]
    fn empty_total_draws_no_fill() {
        let pane = pane(22, 3);
        assert_eq!(pane.filled_width(), 0);
        assert_eq!(pane.title(), "Progress - 0%");
        assert!(pane.reflow().iter().all(|row| row.is_empty()));
    }

    #[test]
    fn fill_tracks_fraction() {
        let mut pane = pane(22, 4);
        pane.update(3, 10);
        assert_eq!(pane.filled_width(), 6);
        assert_eq!(pane.title(), "Progress - 30%");
        let rows = pane.reflow();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].text.len(), 6);
        assert_eq!(rows[0][0].color, ColorToken::Loading);
    }

    #[test]
    fn complete_bar_fills_inner_width() {
        let mut pane = pane(22, 3);
        pane.update(10, 10);
        let mut buf = Buffer::empty(Rect::new(0, 0, 22, 3));
        let palette = Palette::colored();
        PaneWidget::new(&pane, &palette).render(Rect::new(0, 0, 22, 3), &mut buf);
        assert!(buffer_line(&buf, 0).contains("Progress - 100%"));
        for x in 1..21 {
            assert_eq!(buf.get(x, 1).bg, Color::Blue);
        }
    }

    #[test]
    fn relocated_keeps_counters() {
        let mut pane = pane(22, 3);
        pane.update(4, 8);
        let moved = pane.relocated(Rect::new(0, 10, 50, 4));
        assert_eq!(moved.tracker().finished(), 4);
        assert_eq!(moved.tracker().total(), 8);
        assert_eq!(moved.filled_width(), 24);
    }
}
