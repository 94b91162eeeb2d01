//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "notag.toml";

const DEFAULT_CONFIG: &str = r#"# notag configuration
# Flags given to `notag check` are merged on top of this file.

[analyzer]
# Root directory to analyze, relative to the checked path
# root = "."

# Glob patterns to exclude from analysis
exclude = [
    "**/generated/**",
]

# Check `_test.go` files
include_tests = true

# Respect .gitignore files
respect_gitignore = true

[tags]
# Comma-separated tags denied in every package
denied = ""

# Tags denied in packages with a given name: "name:tag1,tag2"
denied_pkg = [
    # "models:db",
]

# Tags denied in packages with a given import path: "path:tag1,tag2"
denied_pkg_path = [
    # "example.com/app/internal/store:json,yaml",
]

# "substring" matches the denied key anywhere in the tag text,
# "exact" only matches parsed tag keys
match = "substring"

# "first" reports the first offending field of each struct, "all" every one
report = "first"

# Severity of findings and the threshold for a failing exit status
severity = "error"
fail_on = "error"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to list denied tags");
    println!("  2. Run: notag check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notag_core::{CheckOptions, Config};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.deny_rules().unwrap().is_empty());
        assert_eq!(config.check_options(), CheckOptions::default());
        assert_eq!(config.analyzer.exclude, ["**/generated/**"]);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        std::fs::write(&path, "# mine\n").unwrap();

        let err = write_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
