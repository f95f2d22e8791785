use crate::{
    colorizer::{AnnotatedLine, annotate},
    severity::Severity,
    text::is_blank,
};

/// decides which producer lines reach the display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilter {
    /// substring every line must contain; only set when logcat could not be scoped by pid
    package_scope: Option<String>,
    min_severity: Severity,
}

impl LineFilter {
    /// logcat already scopes output to the app's pid
    pub fn scoped_by_pid(min_severity: Severity) -> Self {
        Self {
            package_scope: None,
            min_severity,
        }
    }

    /// full device stream, narrowed in-process by package name
    pub fn unscoped(package: impl Into<String>, min_severity: Severity) -> Self {
        Self {
            package_scope: Some(package.into()),
            min_severity,
        }
    }

    pub fn package_scope(&self) -> Option<&str> {
        self.package_scope.as_deref()
    }

    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// package scope, then severity, then colorize
    pub fn admit(&self, line: &str) -> Option<AnnotatedLine> {
        if is_blank(line) {
            return None;
        }
        if let Some(package) = &self.package_scope
            && !line.contains(package.as_str())
        {
            return None;
        }
        if !self.min_severity.matches(line) {
            return None;
        }
        Some(annotate(line))
    }
}
