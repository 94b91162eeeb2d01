//! Deny rules and their per-unit resolution.
//!
//! Rules come in three scopes. Global rules apply to every package,
//! package-name rules to packages with a matching `package` clause, and
//! package-path rules to the package with a matching import path. Scoped
//! rules extend the global list; they never replace it.

use miette::Diagnostic;
use std::collections::HashMap;
use std::str::FromStr;

use crate::context::UnitContext;
use crate::tags::TagKey;

/// Errors raised while parsing deny rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum RuleError {
    /// Entry has no `:` separating the scope from its tags.
    #[error("invalid scoped rule '{raw}': missing ':' delimiter")]
    #[diagnostic(
        code(notag::config::missing_delimiter),
        help("expected `scope:tag1,tag2`, e.g. `models:json,xml`")
    )]
    MissingDelimiter {
        /// The offending entry as given by the user.
        raw: String,
    },

    /// Entry has more than one `:`.
    #[error("invalid scoped rule '{raw}': more than one ':' delimiter")]
    #[diagnostic(
        code(notag::config::extra_delimiter),
        help("expected `scope:tag1,tag2` with exactly one ':'")
    )]
    ExtraDelimiter {
        /// The offending entry as given by the user.
        raw: String,
    },

    /// Entry has an empty scope before the `:`.
    #[error("invalid scoped rule '{raw}': empty scope")]
    #[diagnostic(
        code(notag::config::empty_scope),
        help("name a package or import path before the ':'")
    )]
    EmptyScope {
        /// The offending entry as given by the user.
        raw: String,
    },
}

/// A parsed `scope:tag1,tag2` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    /// Package name or import path the tags apply to.
    pub scope: String,
    /// Denied tag keys for the scope.
    pub tags: Vec<TagKey>,
}

impl FromStr for ScopeEntry {
    type Err = RuleError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split(':');
        let (Some(scope), Some(tags)) = (parts.next(), parts.next()) else {
            return Err(RuleError::MissingDelimiter { raw: raw.to_owned() });
        };
        if parts.next().is_some() {
            return Err(RuleError::ExtraDelimiter { raw: raw.to_owned() });
        }

        let scope = scope.trim();
        if scope.is_empty() {
            return Err(RuleError::EmptyScope { raw: raw.to_owned() });
        }

        Ok(Self {
            scope: scope.to_owned(),
            tags: split_tags(tags),
        })
    }
}

/// Splits a comma-separated tag list, trimming entries and dropping empty ones.
#[must_use]
pub fn split_tags(csv: &str) -> Vec<TagKey> {
    csv.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(TagKey::from)
        .collect()
}

/// Immutable deny rule configuration for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenyRules {
    global: Vec<TagKey>,
    by_name: HashMap<String, Vec<TagKey>>,
    by_path: HashMap<String, Vec<TagKey>>,
}

impl DenyRules {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the three raw configuration inputs.
    ///
    /// # Errors
    ///
    /// Returns the first malformed scoped entry.
    pub fn parse<N, P>(global_csv: &str, by_name: N, by_path: P) -> Result<Self, RuleError>
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let mut rules = Self::new().with_global(split_tags(global_csv));
        for raw in by_name {
            rules = rules.with_package(raw.as_ref().parse()?);
        }
        for raw in by_path {
            rules = rules.with_package_path(raw.as_ref().parse()?);
        }
        Ok(rules)
    }

    /// Replaces the global deny list.
    #[must_use]
    pub fn with_global(mut self, tags: Vec<TagKey>) -> Self {
        self.global = tags;
        self
    }

    /// Adds a package-name rule. A later entry for the same scope wins.
    #[must_use]
    pub fn with_package(mut self, entry: ScopeEntry) -> Self {
        self.by_name.insert(entry.scope, entry.tags);
        self
    }

    /// Adds a package-path rule. A later entry for the same scope wins.
    #[must_use]
    pub fn with_package_path(mut self, entry: ScopeEntry) -> Self {
        self.by_path.insert(entry.scope, entry.tags);
        self
    }

    /// Returns true when no scope has any rule configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_name.is_empty() && self.by_path.is_empty()
    }

    /// Resolves the effective deny list for one compilation unit.
    #[must_use]
    pub fn resolve(&self, unit: &UnitContext) -> ResolvedDenyList {
        let by_name = self.by_name.get(&unit.package_name).map(Vec::as_slice);
        let by_path = self.by_path.get(&unit.package_path).map(Vec::as_slice);

        let layers = [Some(self.global.as_slice()), by_name, by_path];
        let mut keys: Vec<TagKey> = Vec::new();
        for key in layers.into_iter().flatten().flatten() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        ResolvedDenyList { keys }
    }
}

/// Effective deny list for one unit, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDenyList {
    keys: Vec<TagKey>,
}

impl ResolvedDenyList {
    /// Returns true when nothing is denied for the unit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Denied keys, global first, then package name, then package path.
    #[must_use]
    pub fn keys(&self) -> &[TagKey] {
        &self.keys
    }

    /// Number of denied keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
