//! # notag-core
//!
//! Engine for flagging denied struct tag keys.
//!
//! This crate knows nothing about any particular language front end. It
//! provides:
//!
//! - [`tags`]: parsing of `key:"value"` struct tags into distinct keys
//! - [`DenyRules`]: global, per-package-name and per-package-path deny lists
//! - [`Matcher`]: matching an annotation against a resolved deny list
//! - [`SyntaxTree`] / [`StructVisitor`]: the seam a front end implements
//! - [`Analyzer`]: the per-unit pipeline that ties them together
//! - [`Reporter`]: the sink findings are emitted to
//!
//! ## Example
//!
//! ```ignore
//! use notag_core::{Analyzer, CheckOptions, DenyRules, LintResult, UnitContext};
//!
//! let rules = DenyRules::parse("json,xml", ["models:db"], Vec::<String>::new())?;
//! let analyzer = Analyzer::new(rules, CheckOptions::default());
//!
//! let mut result = LintResult::new();
//! analyzer.check_unit(&UnitContext::new("models", "example.com/models"), &files, &mut result);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod matcher;
mod reporter;
mod rules;
mod types;
mod walker;

pub mod tags;

pub use analyzer::{Analyzer, CheckOptions, ReportMode, UnitSummary};
pub use config::{AnalyzerConfig, Config, ConfigError, TagsConfig};
pub use context::UnitContext;
pub use matcher::{MatchPolicy, Matcher};
pub use reporter::{Finding, Reporter};
pub use rules::{split_tags, DenyRules, ResolvedDenyList, RuleError, ScopeEntry};
pub use tags::{Annotation, TagKey};
pub use types::{
    LintResult, Location, Severity, Violation, ViolationDiagnostic, DENIED_TAG_CODE,
    DENIED_TAG_RULE,
};
pub use walker::{Field, StructDecl, StructVisitor, SyntaxTree};
