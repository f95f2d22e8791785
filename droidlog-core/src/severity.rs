use std::fmt;
use std::str::FromStr;

/// logcat priority, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Verbose,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
}

/// markers as they appear in `logcat -v time` output, indexed by `Severity as usize`.
/// each marker carries a leading space so tags like "XI/" are not picked up.
const MARKERS: [&str; 6] = [" V/", " D/", " I/", " W/", " E/", " F/"];

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Verbose,
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn marker(self) -> &'static str {
        MARKERS[self as usize]
    }

    /// markers of this level and of every level more severe than it
    pub fn inclusion_set(self) -> &'static [&'static str] {
        &MARKERS[self as usize..]
    }

    /// true iff the line carries a marker at or above this level
    pub fn matches(self, line: &str) -> bool {
        self.inclusion_set()
            .iter()
            .any(|marker| line.contains(marker))
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Verbose => "verbose",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    pub fn letter(self) -> char {
        match self {
            Severity::Verbose => 'V',
            Severity::Debug => 'D',
            Severity::Info => 'I',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Fatal => 'F',
        }
    }

    /// parse a user or preferences token, falling back to `Info`
    pub fn parse_or_default(token: Option<&str>) -> Self {
        token
            .and_then(|token| token.parse().ok())
            .unwrap_or_default()
    }
}

/// free-function form used by the pipeline filter
pub fn matches(line: &str, min_severity: Severity) -> bool {
    min_severity.matches(line)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}' (expected one of verbose, debug, info, warning, error, fatal)")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v" | "verbose" => Ok(Severity::Verbose),
            "d" | "debug" => Ok(Severity::Debug),
            "i" | "info" => Ok(Severity::Info),
            "w" | "warn" | "warning" => Ok(Severity::Warning),
            "e" | "error" => Ok(Severity::Error),
            "f" | "fatal" | "a" | "assert" => Ok(Severity::Fatal),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
