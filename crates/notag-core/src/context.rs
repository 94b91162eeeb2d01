//! Identity of the compilation unit under analysis.

use serde::{Deserialize, Serialize};

/// Context for one compilation unit (a Go package).
///
/// Built fresh by the host for every unit and never shared between units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitContext {
    /// Short package identifier from the `package` clause (e.g. `models`).
    pub package_name: String,
    /// Fully-qualified import path (e.g. `example.com/app/models`).
    pub package_path: String,
}

impl UnitContext {
    /// Creates a new unit context.
    #[must_use]
    pub fn new(package_name: impl Into<String>, package_path: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            package_path: package_path.into(),
        }
    }
}

impl std::fmt::Display for UnitContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.package_path == self.package_name {
            write!(f, "{}", self.package_name)
        } else {
            write!(f, "{} ({})", self.package_path, self.package_name)
        }
    }
}
