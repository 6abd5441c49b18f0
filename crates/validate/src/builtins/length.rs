//! Length checks

use super::check_arg_count;
use crate::error::{RuleError, RuleResult};
use crate::value::Value;

/// Passes when the length of `value` is exactly `args[0]`.
///
/// Strings are measured in chars, lists in elements, records in fields;
/// custom values must report a length.
pub fn len(value: &Value, args: &[i64]) -> RuleResult<()> {
    check_arg_count("len", args, 1)?;
    let expected = args[0];

    let actual = value
        .len()
        .ok_or_else(|| RuleError::incompatible(format!("cannot guess length of {value}")))?;

    if i64::try_from(actual).is_ok_and(|actual| actual == expected) {
        Ok(())
    } else {
        Err(RuleError::invalid(format!(
            "expected {value} to have length {expected}, got {actual}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{IntArgsFn, Validation};

    #[test]
    fn test_exact_length() {
        let value = Value::from(vec!["a1", "b2", "c3"]);
        assert!(len(&value, &[3]).is_ok());
        assert!(len(&value, &[2]).is_err());
        assert!(len(&value, &[4]).is_err());
        assert_eq!(
            len(&value, &[2]).unwrap_err().to_string(),
            "expected [a1 b2 c3] to have length 2, got 3"
        );
    }

    #[test]
    fn test_string_length_in_chars() {
        assert!(len(&Value::from("añb"), &[3]).is_ok());
    }

    #[test]
    fn test_incompatible_kind() {
        let err = len(&Value::Int(12), &[2]).unwrap_err();
        assert_eq!(err.code(), "RULE:INCOMPATIBLE");
    }

    #[test]
    fn test_argument_checks() {
        assert_eq!(len(&Value::from("ab"), &[]).unwrap_err().code(), "RULE:INVALID_ARG");
        assert_eq!(len(&Value::from("ab"), &[2, 3]).unwrap_err().code(), "RULE:INVALID_ARG");

        let adapter = IntArgsFn("len", len);
        let err = adapter.validate(&Value::from("ab"), &[Value::from("2")]).unwrap_err();
        assert_eq!(err.code(), "RULE:INVALID_ARG");
        assert!(adapter.validate(&Value::from("ab"), &[Value::Float(2.0)]).is_ok());
    }
}
