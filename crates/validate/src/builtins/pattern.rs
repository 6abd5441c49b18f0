//! Regular expression matching

use super::check_arg_count;
use crate::error::{RuleError, RuleResult};
use crate::value::Value;

/// Passes when the string `value` matches the regex in `args[0]`.
///
/// The pattern is either a `/regex/` literal or a bound parameter that
/// resolves to a [`Value::Regex`].
pub fn matches(value: &Value, args: &[Value]) -> RuleResult<()> {
    let s = value
        .as_str()
        .ok_or_else(|| RuleError::incompatible("match requires a string value"))?;

    check_arg_count("match", args, 1)?;
    let re = args[0].as_regex().ok_or_else(|| {
        RuleError::invalid_argument(
            "match",
            format!("expected a regex argument, got {}", args[0].type_name()),
        )
    })?;

    if re.is_match(s) {
        Ok(())
    } else {
        Err(RuleError::invalid(format!("{s} does not match {}", re.as_str())))
    }
}
