//! Output formatting for lint results.

use anyhow::Result;
use miette::GraphicalReportHandler;
use notag_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::fmt::Write;
use std::path::Path;

use crate::OutputFormat;

/// Prints lint results in the given format. `root` is where violation paths
/// are relative to; the fancy format reads sources from there.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", render_text(result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => print!("{}", render_compact(result)),
        OutputFormat::Fancy => {
            print!("{}", render_fancy(result, root, &GraphicalReportHandler::new())?);
        }
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn text_block(out: &mut String, violation: &Violation) {
    let _ = writeln!(
        out,
        "{} {} at {}:{}:{}",
        violation.code,
        violation.rule,
        violation.location.file.display(),
        violation.location.line,
        violation.location.column,
    );
    let _ = writeln!(
        out,
        "  {}: {}",
        severity_indicator(violation.severity),
        violation.message
    );
    if !violation.package.is_empty() {
        let _ = writeln!(out, "  = package: {}", violation.package);
    }
    out.push('\n');
}

fn summary(out: &mut String, result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let _ = writeln!(
        out,
        "{color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} package(s), {} file(s)\x1b[0m",
        result.units_checked, result.files_checked
    );
}

fn render_text(result: &LintResult) -> String {
    let mut out = String::new();
    for violation in &result.violations {
        text_block(&mut out, violation);
    }
    summary(&mut out, result);
    out
}

/// One `file:line:col: message` line per violation.
fn render_compact(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .fold(String::new(), |mut out, violation| {
            let _ = writeln!(out, "{violation}");
            out
        })
}

fn render_fancy(
    result: &LintResult,
    root: &Path,
    handler: &GraphicalReportHandler,
) -> Result<String> {
    let mut out = String::new();

    for violation in &result.violations {
        let path = root.join(&violation.location.file);
        match std::fs::read_to_string(&path) {
            Ok(source) => {
                let diagnostic = ViolationDiagnostic::new(violation, source);
                handler.render_report(&mut out, &diagnostic)?;
                out.push('\n');
            }
            Err(e) => {
                tracing::warn!("Cannot read {} for snippet: {e}", path.display());
                text_block(&mut out, violation);
            }
        }
    }

    summary(&mut out, result);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::GraphicalTheme;
    use notag_core::{Location, DENIED_TAG_CODE, DENIED_TAG_RULE};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn plain() -> GraphicalReportHandler {
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
    }

    const SOURCE: &str = "package models\n\ntype User struct {\n\tName string `json:\"name\"`\n}\n";

    fn result() -> LintResult {
        let offset = SOURCE.find("Name").unwrap();
        let length = "Name string `json:\"name\"`".len();
        let mut result = LintResult::new();
        result.units_checked = 1;
        result.files_checked = 1;
        result.violations.push(
            Violation::new(
                DENIED_TAG_CODE,
                DENIED_TAG_RULE,
                Severity::Error,
                Location::new(PathBuf::from("models/user.go"), 4, 2).with_span(offset, length),
                "field 'Name' contains denied tags: 'json'",
            )
            .in_package("example.com/app/models"),
        );
        result
    }

    #[test]
    fn compact_is_one_line_per_violation() {
        insta::assert_snapshot!(render_compact(&result()), @"models/user.go:4:2: field 'Name' contains denied tags: 'json'");
    }

    #[test]
    fn text_has_block_and_summary() {
        let text = render_text(&result());
        assert!(text.starts_with("NT001 denied-tag at models/user.go:4:2\n"));
        assert!(text.contains("field 'Name' contains denied tags: 'json'"));
        assert!(text.contains("= package: example.com/app/models"));
        assert!(text.contains(
            "Found 1 error(s), 0 warning(s), 0 info(s) in 1 package(s), 1 file(s)"
        ));
    }

    #[test]
    fn fancy_renders_source_snippet() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("models")).unwrap();
        std::fs::write(tmp.path().join("models/user.go"), SOURCE).unwrap();

        let out = render_fancy(&result(), tmp.path(), &plain()).unwrap();
        assert!(out.contains("[NT001] field 'Name' contains denied tags: 'json'"));
        assert!(out.contains("models/user.go"));
        assert!(out.contains("Name string"));
    }

    #[test]
    fn fancy_falls_back_to_text_without_source() {
        let tmp = TempDir::new().unwrap();
        let out = render_fancy(&result(), tmp.path(), &plain()).unwrap();
        assert!(out.contains("NT001 denied-tag at models/user.go:4:2"));
    }

    #[test]
    fn json_round_trips_result() {
        let json = serde_json::to_string(&result()).unwrap();
        let back: LintResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.violations, result().violations);
    }
}
