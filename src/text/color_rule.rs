use regex::Regex;

use super::{ColorToken, Segment};
use crate::DashboardError;

/// A colorization rule: lines starting with a match of `pattern` get the
/// text of its capture groups painted with `colors`, cycling through them.
#[derive(Debug, Clone)]
pub struct ColorRule {
    anchored: Regex,
    scanner: Regex,
    colors: Vec<ColorToken>,
}

impl ColorRule {
    /// Compile a rule. The capture groups of `pattern` are combined into an
    /// alternation that is scanned across the whole line; a pattern without
    /// groups scans for the pattern itself.
    pub fn new(pattern: &str, colors: &[ColorToken]) -> Result<Self, DashboardError> {
        if colors.is_empty() {
            return Err(DashboardError::invalid(format!(
                "color rule {pattern:?} needs at least one color"
            )));
        }
        let anchored = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|err| DashboardError::invalid(format!("bad color rule {pattern:?}: {err}")))?;
        let groups = capture_group_sources(pattern);
        let scanner_source = if groups.is_empty() {
            pattern.to_string()
        } else {
            format!("{}{}", leading_flags(pattern), groups.join("|"))
        };
        let scanner = Regex::new(&scanner_source)
            .map_err(|err| DashboardError::invalid(format!("bad color rule {pattern:?}: {err}")))?;
        Ok(Self {
            anchored,
            scanner,
            colors: colors.to_vec(),
        })
    }

    pub fn matches(&self, line: &str) -> bool {
        self.anchored.is_match(line)
    }

    fn color_for(&self, occurrence: usize) -> ColorToken {
        self.colors[occurrence % self.colors.len()]
    }
}

/// Split `line` into colored word segments using the first rule that matches.
///
/// Text outside the rule's groups (or the whole line when no rule matches)
/// becomes uncolored segments, one per whitespace-separated word.
pub fn match_line(line: &str, rules: &[ColorRule]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let Some(rule) = rules.iter().find(|rule| rule.matches(line)) else {
        push_words(&mut segments, line, ColorToken::Plain);
        return segments;
    };

    let mut last_end = 0usize;
    let mut occurrence = 0usize;
    for found in rule.scanner.find_iter(line) {
        if found.as_str().is_empty() {
            continue;
        }
        push_words(&mut segments, &line[last_end..found.start()], ColorToken::Plain);
        push_words(&mut segments, found.as_str(), rule.color_for(occurrence));
        occurrence += 1;
        last_end = found.end();
    }
    push_words(&mut segments, &line[last_end..], ColorToken::Plain);
    segments
}

fn push_words(segments: &mut Vec<Segment>, text: &str, color: ColorToken) {
    segments.extend(text.split_whitespace().map(|word| Segment::new(word, color)));
}

/// A bare `(?flags)` group at the start of `pattern`, e.g. `(?i)`. Its flags
/// apply to the whole pattern, so the scanner has to carry them too.
fn leading_flags(pattern: &str) -> &str {
    let Some(rest) = pattern.strip_prefix("(?") else {
        return "";
    };
    let flags = rest
        .find(|ch: char| !(ch.is_ascii_alphabetic() || ch == '-'))
        .unwrap_or(rest.len());
    if rest[flags..].starts_with(')') {
        &pattern[..flags + 3]
    } else {
        ""
    }
}

/// Source text of each top-level capturing group, parentheses included.
fn capture_group_sources(pattern: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut group_start = 0usize;
    let mut capturing = false;
    let mut in_class = false;
    let mut escaped = false;

    for (idx, ch) in pattern.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                if depth == 0 {
                    let rest = &pattern[idx + 1..];
                    capturing = !rest.starts_with('?')
                        || rest.starts_with("?P<")
                        || rest.starts_with("?<");
                    group_start = idx;
                }
                depth += 1;
            }
            ')' if !in_class && depth > 0 => {
                depth -= 1;
                if depth == 0 && capturing {
                    groups.push(&pattern[group_start..=idx]);
                }
            }
            _ => {}
        }
    }
    groups
}
