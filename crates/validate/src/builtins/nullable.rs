//! Zero-value checks

use crate::error::{RuleError, RuleResult};
use crate::value::Value;

/// Passes when `value` is its kind's zero value
pub fn nil(value: &Value) -> RuleResult<()> {
    if value.is_zero() {
        Ok(())
    } else {
        Err(RuleError::invalid(format!("expected {value} to be nil")))
    }
}

/// Passes when `value` is not its kind's zero value
pub fn required(value: &Value) -> RuleResult<()> {
    if value.is_zero() {
        Err(RuleError::invalid(format!("expected {value} not to be nil")))
    } else {
        Ok(())
    }
}
