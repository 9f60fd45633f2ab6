use super::Segment;
use crate::utf8_safe::{display_width, ellipsize_columns};

/// Prefix of a row that continues the previous one. The tab is painted as a
/// single column.
pub const CONTINUATION_MARKER: &str = "|--\t";
/// Columns kept free at the right edge of a wrapped row.
pub const WRAP_MARGIN: usize = 5;

const MARKER_COLUMNS: usize = 4;

/// A displayable row: segments painted left to right, one space apart.
pub type Row = Vec<Segment>;

/// Break colored segments into rows no wider than `max_width` columns.
///
/// Every segment costs its width plus one separator. When the next segment
/// would push the row past `max_width - WRAP_MARGIN`, a new row is opened
/// with the segment behind [`CONTINUATION_MARKER`]. Words too long for any
/// row are clipped with an ellipsis. Always returns at least one row.
///
/// Rows too narrow to hold the marker continue without it, and a zero width
/// yields a single empty row.
pub fn reflow(segments: &[Segment], max_width: usize) -> Vec<Row> {
    if max_width == 0 {
        return vec![Vec::new()];
    }
    let (marker, marker_cols) = if max_width > MARKER_COLUMNS {
        (CONTINUATION_MARKER, MARKER_COLUMNS)
    } else {
        ("", 0)
    };
    let budget = max_width.saturating_sub(WRAP_MARGIN);
    let clip_cols = if marker_cols == 0 {
        max_width
    } else {
        budget.saturating_sub(MARKER_COLUMNS).max(1)
    };

    let mut rows = Vec::new();
    let mut current: Row = Vec::new();
    let mut width = 0usize;

    for segment in segments {
        let text = ellipsize_columns(&segment.text, clip_cols);
        let text_width = display_width(&text);
        if !current.is_empty() && width + text_width + 1 > budget {
            rows.push(std::mem::take(&mut current));
            current.push(Segment::new(format!("{marker}{text}"), segment.color));
            width = text_width;
        } else {
            current.push(Segment::new(text, segment.color));
            width += text_width + 1;
        }
    }
    rows.push(current);
    rows
}

/// Columns a row occupies once painted.
pub fn row_width(row: &Row) -> usize {
    let text: usize = row
        .iter()
        .map(|segment| display_width(&segment.text.replace('\t', " ")))
        .sum();
    text + row.len().saturating_sub(1)
}
