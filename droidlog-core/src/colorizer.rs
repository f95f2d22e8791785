use crate::{severity::Severity, text::sanitize_control_chars, theme::LEVEL_COLORS};
use crossterm::style::Color;

/// a producer line ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub text: String,
    /// level of the first marker found, `None` when the line is passed through untagged
    pub level: Option<Severity>,
    pub color: Option<Color>,
}

impl AnnotatedLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: None,
            color: None,
        }
    }
}

/// tag the line with the style of the highest-priority marker it contains
pub fn annotate(line: &str) -> AnnotatedLine {
    let text = sanitize_control_chars(line);
    for (level, color) in LEVEL_COLORS {
        if line.contains(level.marker()) {
            return AnnotatedLine {
                text,
                level: Some(level),
                color: Some(color),
            };
        }
    }
    AnnotatedLine::plain(text)
}
