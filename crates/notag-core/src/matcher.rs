//! Matching field annotations against a resolved deny list.

use serde::{Deserialize, Serialize};

use crate::rules::ResolvedDenyList;
use crate::tags::{Annotation, TagKey};

/// How a denied key is compared with a field annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// The raw tag text contains the denied key anywhere.
    ///
    /// Coarse: a denied `db` also hits `dbignore:"x"` and `json:"db"`.
    #[default]
    Substring,
    /// The denied key is one of the parsed tag keys.
    Exact,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substring => write!(f, "substring"),
            Self::Exact => write!(f, "exact"),
        }
    }
}

/// Checks annotations against one unit's deny list.
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    deny: &'a ResolvedDenyList,
    policy: MatchPolicy,
}

impl<'a> Matcher<'a> {
    /// Creates a matcher over `deny` using `policy`.
    #[must_use]
    pub fn new(deny: &'a ResolvedDenyList, policy: MatchPolicy) -> Self {
        Self { deny, policy }
    }

    /// Returns the offending keys in deny-list order, or `None` if the
    /// annotation is clean. Comparison is case-sensitive.
    #[must_use]
    pub fn check(&self, annotation: &Annotation<'_>) -> Option<Vec<TagKey>> {
        let offending: Vec<TagKey> = self
            .deny
            .keys()
            .iter()
            .filter(|denied| match self.policy {
                MatchPolicy::Substring => annotation.raw().contains(denied.as_str()),
                MatchPolicy::Exact => annotation.has_key(denied),
            })
            .cloned()
            .collect();

        (!offending.is_empty()).then_some(offending)
    }
}
