//! Column-aware string helpers for painting into fixed-width panes.
//!
//! Pane content comes from arbitrary labels and error messages, so every
//! clip has to respect UTF-8 boundaries and double-width glyphs.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Return a slice of the string bounded by display columns rather than raw characters.
/// A double-width glyph that would straddle the right edge is left out.
pub fn window_by_columns(s: &str, start_cols: usize, width_cols: usize) -> &str {
    if width_cols == 0 || s.is_empty() {
        return "";
    }

    let mut col = 0usize;
    let mut start_byte = 0usize;
    let mut start_found = false;
    let mut end_byte = s.len();
    let target_end = start_cols.saturating_add(width_cols);

    for (idx, ch) in s.char_indices() {
        let glyph_width = UnicodeWidthChar::width(ch).unwrap_or(0).max(1);
        let next_col = col.saturating_add(glyph_width);

        if !start_found && col <= start_cols && start_cols < next_col {
            start_byte = idx;
            start_found = true;
        }

        if start_found && next_col > target_end {
            end_byte = idx;
            break;
        }

        col = next_col;
    }

    if !start_found || start_byte > end_byte {
        return "";
    }

    &s[start_byte..end_byte]
}

/// Clip `s` to `max_cols` display columns, marking the cut with an ellipsis.
pub fn ellipsize_columns(s: &str, max_cols: usize) -> String {
    if display_width(s) <= max_cols {
        return s.to_string();
    }
    if max_cols <= 1 {
        return String::from("…");
    }
    format!("{}…", window_by_columns(s, 0, max_cols - 1))
}
