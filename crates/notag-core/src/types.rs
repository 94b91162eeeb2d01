//! Core types for lint violations and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rule code attached to every denied-tag violation.
pub const DENIED_TAG_CODE: &str = "NT001";

/// Rule name attached to every denied-tag violation.
pub const DENIED_TAG_RULE: &str = "denied-tag";

/// Severity level for lint violations.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "NT001").
    pub code: String,
    /// Rule name (e.g., "denied-tag").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Import path of the package the violation belongs to.
    pub package: String,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            package: String::new(),
            location,
            message: message.into(),
        }
    }

    /// Records the package the violation belongs to.
    #[must_use]
    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.message
        )
    }
}

/// A violation paired with its source text, renderable by miette.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[help]
    help: Option<String>,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic for `violation` over the full text of its file.
    #[must_use]
    pub fn new(violation: &Violation, source: String) -> Self {
        let name = violation.location.file.display().to_string();
        Self {
            message: format!("[{}] {}", violation.code, violation.message),
            src: NamedSource::new(name, source),
            span: SourceSpan::from((violation.location.offset, violation.location.length)),
            label_message: violation.rule.clone(),
            help: (!violation.package.is_empty())
                .then(|| format!("denied in package {}", violation.package)),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found, in emission order.
    pub violations: Vec<Violation>,
    /// Number of packages checked.
    pub units_checked: usize,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.units_checked += other.units_checked;
        self.files_checked += other.files_checked;
    }
}
