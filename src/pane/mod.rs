//! Titled, bordered rectangles of dashboard content.
//!
//! Both pane kinds turn their content into [`Row`]s via [`Renderable::reflow`]
//! and share one painter, so width clipping lives in a single place.

mod palette;
mod progress_pane;
mod text_pane;

pub use palette::Palette;
pub use progress_pane::ProgressPane;
pub use text_pane::TextPane;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};
use std::sync::Arc;

use crate::text::{ColorRule, Row};
use crate::utf8_safe::{display_width, window_by_columns};

/// Construction-time settings of a pane. Panes are rebuilt, not edited,
/// when any of these change.
#[derive(Debug, Clone)]
pub struct PaneConfig {
    pub title: String,
    pub geometry: Rect,
    pub rules: Arc<Vec<ColorRule>>,
}

impl PaneConfig {
    pub fn new(title: impl Into<String>, geometry: Rect, rules: Arc<Vec<ColorRule>>) -> Self {
        Self {
            title: title.into(),
            geometry,
            rules,
        }
    }

    pub fn with_geometry(&self, geometry: Rect) -> Self {
        Self {
            geometry,
            ..self.clone()
        }
    }

    /// Rows available inside the border.
    pub fn visible_rows(&self) -> usize {
        usize::from(self.geometry.height.saturating_sub(2))
    }

    /// Columns available inside the border.
    pub fn inner_width(&self) -> usize {
        usize::from(self.geometry.width.saturating_sub(2))
    }
}

pub trait Renderable {
    fn config(&self) -> &PaneConfig;

    fn title(&self) -> String {
        self.config().title.clone()
    }

    /// Rows to show this frame, top to bottom, at most `visible_rows`.
    fn reflow(&self) -> Vec<Row>;
}

/// Paints a pane's border, title and rows into a frame buffer.
pub struct PaneWidget<'a, P: Renderable + ?Sized> {
    pane: &'a P,
    palette: &'a Palette,
}

impl<'a, P: Renderable + ?Sized> PaneWidget<'a, P> {
    pub fn new(pane: &'a P, palette: &'a Palette) -> Self {
        Self { pane, palette }
    }
}

impl<P: Renderable + ?Sized> Widget for PaneWidget<'_, P> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.width < 2 || area.height < 2 {
            return;
        }
        let title = format!(" {} ", self.pane.title());
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .render(area, buf);

        let inner_width = usize::from(area.width - 2);
        let visible = usize::from(area.height - 2);
        for (offset, row) in self.pane.reflow().iter().take(visible).enumerate() {
            let y = area.y + 1 + offset as u16;
            paint_row(row, area.x + 1, y, inner_width, buf, self.palette);
        }
    }
}

fn paint_row(row: &Row, x: u16, y: u16, width: usize, buf: &mut Buffer, palette: &Palette) {
    let mut col = 0usize;
    for segment in row {
        if col >= width {
            // Row wider than the pane: drop the tail instead of failing the frame.
            break;
        }
        let text = segment.text.replace('\t', " ");
        let clipped = window_by_columns(&text, 0, width - col);
        buf.set_stringn(
            x + col as u16,
            y,
            clipped,
            width - col,
            palette.style(segment.color),
        );
        col += display_width(clipped) + 1;
    }
}
