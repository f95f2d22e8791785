use crate::severity::Severity;
use crossterm::style::{Attribute, Color, ContentStyle};

pub const TEXT_FG_COLOR: Color = Color::Grey;

pub const FATAL_COLOR: Color = Color::Magenta;

pub const ERROR_COLOR: Color = Color::Red;

pub const WARN_COLOR: Color = Color::Yellow;

pub const INFO_COLOR: Color = Color::White;

pub const DEBUG_COLOR: Color = Color::Green;

pub const VERBOSE_COLOR: Color = Color::DarkGrey;

// android-orange, used for the banner and prompts
pub const ACCENT_COLOR: Color = Color::Rgb {
    r: 255,
    g: 165,
    b: 0,
};

/// (level, color) in colorizer priority order: the first marker found wins
pub const LEVEL_COLORS: [(Severity, Color); 6] = [
    (Severity::Fatal, FATAL_COLOR),
    (Severity::Error, ERROR_COLOR),
    (Severity::Warning, WARN_COLOR),
    (Severity::Info, INFO_COLOR),
    (Severity::Debug, DEBUG_COLOR),
    (Severity::Verbose, VERBOSE_COLOR),
];

pub fn level_color(level: Severity) -> Color {
    LEVEL_COLORS
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, color)| *color)
        .unwrap_or(TEXT_FG_COLOR)
}

pub fn level_style(level: Option<Severity>) -> ContentStyle {
    let mut style = ContentStyle::new();
    match level {
        Some(level) => {
            style.foreground_color = Some(level_color(level));
            if level == Severity::Fatal {
                style.attributes.set(Attribute::Bold);
            }
        }
        None => style.foreground_color = Some(TEXT_FG_COLOR),
    }
    style
}
