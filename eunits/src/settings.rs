//! Engine settings

use eunits_core::Basis;
use serde::{Deserialize, Serialize};

/// What arithmetic does when two operands disagree on substance, basis or
/// reference year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataPolicy {
    /// Drop the field from the result and record a warning
    #[default]
    Warn,
    /// Fail with `MetadataConflict`
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub metadata_policy: MetadataPolicy,
    /// Basis assumed for a substance-bearing amount that has no basis tag
    pub default_basis: Basis,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            metadata_policy: MetadataPolicy::Warn,
            default_basis: Basis::Lhv,
        }
    }
}

impl Settings {
    pub fn strict(mut self) -> Self {
        self.metadata_policy = MetadataPolicy::Strict;
        self
    }

    pub fn with_default_basis(mut self, basis: Basis) -> Self {
        self.default_basis = basis;
        self
    }
}
