//! Per-unit check pipeline.
//!
//! For each compilation unit the analyzer resolves the deny list, walks every
//! struct of every file in order, parses each tagged field, matches it, and
//! hands findings to a [`Reporter`]. The analyzer holds only immutable
//! configuration, so one instance may check several units concurrently.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::context::UnitContext;
use crate::matcher::{MatchPolicy, Matcher};
use crate::reporter::{Finding, Reporter};
use crate::rules::{DenyRules, ResolvedDenyList};
use crate::tags::Annotation;
use crate::types::Severity;
use crate::walker::{StructDecl, StructVisitor, SyntaxTree};

/// Which offending fields of a struct are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Only the first offending field, in declaration order.
    #[default]
    #[serde(alias = "first-per-struct")]
    First,
    /// Every offending field.
    #[serde(alias = "every-field")]
    All,
}

/// Options shared by every unit of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    /// How denied keys are compared with annotations.
    pub policy: MatchPolicy,
    /// Which offending fields of a struct are reported.
    pub mode: ReportMode,
    /// Severity attached to findings.
    pub severity: Severity,
}

/// Summary of one unit's check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnitSummary {
    /// Whether the unit was walked at all.
    pub walked: bool,
    /// Number of struct types visited.
    pub structs: usize,
    /// Number of findings reported.
    pub findings: usize,
}

/// Runs the check pipeline for compilation units.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    rules: DenyRules,
    options: CheckOptions,
}

impl Analyzer {
    /// Creates an analyzer from an immutable rule set and options.
    #[must_use]
    pub fn new(rules: DenyRules, options: CheckOptions) -> Self {
        Self { rules, options }
    }

    /// The rule set this analyzer checks against.
    #[must_use]
    pub fn rules(&self) -> &DenyRules {
        &self.rules
    }

    /// Checks one compilation unit.
    ///
    /// When the resolved deny list is empty no file is walked.
    pub fn check_unit<T: SyntaxTree>(
        &self,
        unit: &UnitContext,
        files: &[T],
        reporter: &mut dyn Reporter,
    ) -> UnitSummary {
        let deny = self.rules.resolve(unit);
        if deny.is_empty() {
            debug!("No denied tags for {unit}, skipping");
            return UnitSummary::default();
        }
        debug!("Checking {unit} against {} denied tag(s)", deny.len());

        let mut pass = UnitPass {
            unit,
            deny: &deny,
            options: self.options,
            reporter,
            summary: UnitSummary {
                walked: true,
                ..UnitSummary::default()
            },
        };

        for file in files {
            trace!("Walking {}", file.path().display());
            file.walk_structs(&mut pass);
        }

        pass.summary
    }
}

/// Visitor state for a single unit. Dropped when the unit is done.
struct UnitPass<'a, 'r> {
    unit: &'a UnitContext,
    deny: &'a ResolvedDenyList,
    options: CheckOptions,
    reporter: &'r mut dyn Reporter,
    summary: UnitSummary,
}

impl StructVisitor for UnitPass<'_, '_> {
    fn visit_struct(&mut self, decl: &StructDecl<'_>) {
        self.summary.structs += 1;
        trace!(
            "Visiting struct {} with {} field(s)",
            decl.name.unwrap_or("<anonymous>"),
            decl.fields.len()
        );

        let matcher = Matcher::new(self.deny, self.options.policy);

        for field in &decl.fields {
            let Some(raw) = field.tag else {
                continue;
            };
            let annotation = Annotation::parse(raw);
            let Some(offending) = matcher.check(&annotation) else {
                continue;
            };

            self.reporter.report(
                self.unit,
                Finding {
                    field: field.name.to_owned(),
                    offending,
                    location: field.location.clone(),
                    severity: self.options.severity,
                },
            );
            self.summary.findings += 1;

            if self.options.mode == ReportMode::First {
                break;
            }
        }
    }
}
