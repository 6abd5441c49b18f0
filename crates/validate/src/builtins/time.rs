//! Timestamp format checks

use crate::error::{RuleError, RuleResult};
use chrono::DateTime;

/// Passes when `s` parses as an RFC 3339 timestamp
pub fn rfc3339(s: &str) -> RuleResult<()> {
    DateTime::parse_from_rfc3339(s)
        .map(|_| ())
        .map_err(|e| RuleError::invalid(format!("{s} is not an RFC 3339 timestamp: {e}")))
}
