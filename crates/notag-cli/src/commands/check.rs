//! Check command implementation.

use anyhow::{Context, Result};
use notag_core::{Analyzer, Config, LintResult};
use notag_go::{check_packages, PackageLoader};
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::CheckArgs;

/// Runs the check command. Returns true when a violation reaches the
/// configured `fail_on` severity.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<bool> {
    let mut config = source.load()?;
    apply_flags(&mut config, args);

    let rules = config
        .deny_rules()
        .context("Invalid denied tag configuration")?;
    let analyzer = Analyzer::new(rules, config.check_options());
    let root = analysis_root(&config, args);

    let result = if analyzer.rules().is_empty() {
        tracing::info!("No denied tags configured, nothing to check");
        LintResult::new()
    } else {
        tracing::info!("Analyzing {}", root.display());
        let packages = PackageLoader::from_config(&root, &config.analyzer)
            .context("Invalid exclude pattern")?
            .load()
            .with_context(|| format!("Failed to load Go packages under {}", root.display()))?;
        check_packages(&analyzer, &packages)
    };

    super::output::print(&result, args.format, &root)?;

    Ok(result.has_violations_at(config.tags.fail_on))
}

/// Merges command-line flags into the loaded config. Scoped entries are
/// appended after the file's, so a flag wins for a repeated scope.
fn apply_flags(config: &mut Config, args: &CheckArgs) {
    if let Some(denied) = args.denied.as_deref().filter(|d| !d.trim().is_empty()) {
        config.tags.denied = denied.to_owned();
    }
    config.tags.denied_pkg.extend(args.denied_pkg.iter().cloned());
    config
        .tags
        .denied_pkg_path
        .extend(args.denied_pkg_path.iter().cloned());

    if let Some(policy) = args.match_policy {
        config.tags.match_policy = policy.into();
    }
    if let Some(report) = args.report {
        config.tags.report = report.into();
    }

    config.analyzer.exclude.extend(args.exclude.iter().cloned());
    if args.no_tests {
        config.analyzer.include_tests = false;
    }
}

fn analysis_root(config: &Config, args: &CheckArgs) -> PathBuf {
    if config.analyzer.root.is_absolute() {
        config.analyzer.root.clone()
    } else {
        args.path.join(&config.analyzer.root)
    }
}
