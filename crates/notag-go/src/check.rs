//! Runs the analyzer over loaded Go packages.

use notag_core::{Analyzer, LintResult};
use tracing::info;

use crate::loader::GoPackage;

/// Checks every package in order and collects the violations.
///
/// When the rule set is empty nothing is walked and the result is empty.
#[must_use]
pub fn check_packages(analyzer: &Analyzer, packages: &[GoPackage]) -> LintResult {
    let mut result = LintResult::new();

    if analyzer.rules().is_empty() {
        info!("No denied tags configured, nothing to check");
        return result;
    }

    for package in packages {
        let summary = analyzer.check_unit(&package.context, &package.files, &mut result);
        if summary.walked {
            result.units_checked += 1;
            result.files_checked += package.files.len();
        }
    }

    info!(
        "Checked {} package(s), {} file(s): {} violation(s)",
        result.units_checked,
        result.files_checked,
        result.violations.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::GoFile;
    use notag_core::{CheckOptions, DenyRules, UnitContext};
    use std::path::PathBuf;

    fn package(name: &str, path: &str, src: &str) -> GoPackage {
        GoPackage {
            context: UnitContext::new(name, path),
            dir: PathBuf::from(name),
            files: vec![GoFile::parse(format!("{name}/a.go"), src.to_owned()).unwrap()],
        }
    }

    #[test]
    fn counts_only_walked_packages() {
        let rules = DenyRules::new().with_package("models:db".parse().unwrap());
        let analyzer = Analyzer::new(rules, CheckOptions::default());
        let packages = [
            package("models", "m", "package models\ntype T struct{ A int `db:\"a\"` }\n"),
            package("other", "o", "package other\ntype T struct{ A int `db:\"a\"` }\n"),
        ];

        let result = check_packages(&analyzer, &packages);
        assert_eq!(result.units_checked, 1);
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].package, "m");
    }

    #[test]
    fn empty_rules_check_nothing() {
        let analyzer = Analyzer::new(DenyRules::new(), CheckOptions::default());
        let packages = [package("p", "p", "package p\ntype T struct{ A int `json:\"a\"` }\n")];
        let result = check_packages(&analyzer, &packages);
        assert_eq!(result.units_checked, 0);
        assert!(result.violations.is_empty());
    }
}
