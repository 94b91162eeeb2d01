//! Findings and the sinks that receive them.

use crate::context::UnitContext;
use crate::tags::TagKey;
use crate::types::{LintResult, Location, Severity, Violation, DENIED_TAG_CODE, DENIED_TAG_RULE};

/// One field that carries denied tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Name of the offending field.
    pub field: String,
    /// Offending keys in deny-list order.
    pub offending: Vec<TagKey>,
    /// Position of the field.
    pub location: Location,
    /// Severity configured for the run.
    pub severity: Severity,
}

impl Finding {
    /// Offending keys joined with commas.
    #[must_use]
    pub fn offending_keys(&self) -> String {
        self.offending
            .iter()
            .map(TagKey::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The diagnostic message for this finding.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "field '{}' contains denied tags: '{}'",
            self.field,
            self.offending_keys()
        )
    }
}

/// Sink for findings. Called once per finding, in emission order.
pub trait Reporter {
    /// Receives a finding for `unit`.
    fn report(&mut self, unit: &UnitContext, finding: Finding);
}

impl Reporter for LintResult {
    fn report(&mut self, unit: &UnitContext, finding: Finding) {
        let message = finding.message();
        self.violations.push(
            Violation::new(
                DENIED_TAG_CODE,
                DENIED_TAG_RULE,
                finding.severity,
                finding.location,
                message,
            )
            .in_package(&unit.package_path),
        );
    }
}

impl<F> Reporter for F
where
    F: FnMut(&UnitContext, Finding),
{
    fn report(&mut self, unit: &UnitContext, finding: Finding) {
        self(unit, finding);
    }
}
