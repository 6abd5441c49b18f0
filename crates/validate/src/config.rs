//! Validator configuration

use serde::{Deserialize, Serialize};

/// Default number of parsed rules kept in the cache
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Default rule text that exempts a field
pub const DEFAULT_SKIP_MARKER: &str = "-";

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Reject fields that carry no rule at all
    pub rule_required: bool,

    /// Maximum number of parsed rules retained (0 disables caching)
    pub cache_capacity: u64,

    /// Rule text that explicitly exempts a field from validation
    pub skip_marker: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            rule_required: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            skip_marker: DEFAULT_SKIP_MARKER.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Check whether `rule` exempts a field
    pub fn is_skip(&self, rule: &str) -> bool {
        rule.trim() == self.skip_marker
    }
}
