//! Configuration types for notag.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::analyzer::{CheckOptions, ReportMode};
use crate::matcher::MatchPolicy;
use crate::rules::{DenyRules, RuleError};
use crate::types::Severity;

/// Top-level configuration for notag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Denied tag configuration.
    #[serde(default)]
    pub tags: TagsConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Builds the immutable deny rule set from the `[tags]` section.
    ///
    /// # Errors
    ///
    /// Returns an error for the first malformed `scope:tags` entry.
    pub fn deny_rules(&self) -> Result<DenyRules, ConfigError> {
        Ok(DenyRules::parse(
            &self.tags.denied,
            &self.tags.denied_pkg,
            &self.tags.denied_pkg_path,
        )?)
    }

    /// Options shared by every unit of the run.
    #[must_use]
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            policy: self.tags.match_policy,
            mode: self.tags.report,
            severity: self.tags.severity,
        }
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether `_test.go` files are checked.
    #[serde(default = "default_true")]
    pub include_tests: bool,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            include_tests: true,
            respect_gitignore: true,
        }
    }
}

/// The `[tags]` section: what is denied and how it is matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Comma-separated tags denied in every package.
    #[serde(default)]
    pub denied: String,

    /// Per-package-name entries, `pkg:tag1,tag2`.
    #[serde(default)]
    pub denied_pkg: Vec<String>,

    /// Per-import-path entries, `example.com/app/pkg:tag1,tag2`.
    #[serde(default)]
    pub denied_pkg_path: Vec<String>,

    /// Matching policy: `"substring"` (default) or `"exact"`.
    #[serde(default, rename = "match")]
    pub match_policy: MatchPolicy,

    /// Reporting mode: `"first"` (default) or `"all"`.
    #[serde(default)]
    pub report: ReportMode,

    /// Severity of findings (default: `"error"`).
    #[serde(default)]
    pub severity: Severity,

    /// Severity threshold for a failing exit status (default: `"error"`).
    #[serde(default)]
    pub fail_on: Severity,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Malformed deny rule.
    #[error(transparent)]
    Rule(#[from] RuleError),
}
