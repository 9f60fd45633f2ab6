use ratatui::style::{Color, Modifier, Style};

use crate::text::ColorToken;

const SLOTS: usize = 9;

/// Maps color tokens to terminal styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    styles: [Style; SLOTS],
}

impl Palette {
    pub fn colored() -> Self {
        let mut styles = [Style::default(); SLOTS];
        styles[ColorToken::Loading.index()] = Style::default().fg(Color::White).bg(Color::Blue);
        styles[ColorToken::Warn.index()] = Style::default().fg(Color::Yellow);
        styles[ColorToken::Error.index()] = Style::default().fg(Color::Red);
        styles[ColorToken::Info.index()] = Style::default().fg(Color::Cyan);
        styles[ColorToken::Queued.index()] = Style::default().fg(Color::Blue);
        styles[ColorToken::Ok.index()] = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        styles[ColorToken::Failed.index()] = Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD);
        styles[ColorToken::Dim.index()] = Style::default().fg(Color::DarkGray);
        Self { styles }
    }

    /// Attribute-only palette for `--no-color` and dumb terminals.
    pub fn monochrome() -> Self {
        let mut styles = [Style::default(); SLOTS];
        styles[ColorToken::Loading.index()] = Style::default().add_modifier(Modifier::REVERSED);
        styles[ColorToken::Error.index()] = Style::default().add_modifier(Modifier::BOLD);
        styles[ColorToken::Failed.index()] = Style::default().add_modifier(Modifier::BOLD);
        styles[ColorToken::Dim.index()] = Style::default().add_modifier(Modifier::DIM);
        Self { styles }
    }

    pub fn style(&self, token: ColorToken) -> Style {
        self.styles[token.index()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_token_has_no_style() {
        assert_eq!(Palette::colored().style(ColorToken::Plain), Style::default());
        assert_eq!(Palette::monochrome().style(ColorToken::Plain), Style::default());
    }

    #[test]
    fn loading_fill_is_visible_in_both_palettes() {
        assert_eq!(
            Palette::colored().style(ColorToken::Loading).bg,
            Some(Color::Blue)
        );
        assert!(Palette::monochrome()
            .style(ColorToken::Loading)
            .add_modifier
            .contains(Modifier::REVERSED));
    }

    #[test]
    fn monochrome_never_sets_colors() {
        let palette = Palette::monochrome();
        for token in [
            ColorToken::Loading,
            ColorToken::Warn,
            ColorToken::Error,
            ColorToken::Info,
            ColorToken::Queued,
            ColorToken::Ok,
            ColorToken::Failed,
            ColorToken::Dim,
        ] {
            assert_eq!(palette.style(token).fg, None);
            assert_eq!(palette.style(token).bg, None);
        }
    }
}
