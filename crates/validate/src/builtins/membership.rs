//! Whitelist and blacklist membership checks
//!
//! Numbers compare by numeric value regardless of kind, so an `Int(3)` field
//! matches a `3.0` argument and a `Uint(3)` field matches `3`. Integer pairs
//! compare exactly; `f64` is only used once a float is involved.

use crate::error::{RuleError, RuleResult};
use crate::value::Value;

fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Int(n) => Some(i128::from(*n)),
        Value::Uint(n) => Some(i128::from(*n)),
        _ => None,
    }
}

fn same(a: &Value, b: &Value) -> bool {
    if let (Some(x), Some(y)) = (as_integer(a), as_integer(b)) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn render_set(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Passes when `value` equals one of `args`
pub fn whitelist(value: &Value, args: &[Value]) -> RuleResult<()> {
    if args.iter().any(|arg| same(value, arg)) {
        Ok(())
    } else {
        Err(RuleError::invalid(format!("{value} not in ({})", render_set(args))))
    }
}

/// Passes when `value` equals none of `args`
pub fn blacklist(value: &Value, args: &[Value]) -> RuleResult<()> {
    if args.iter().any(|arg| same(value, arg)) {
        Err(RuleError::invalid(format!("{value} in ({})", render_set(args))))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn names() -> Vec<Value> {
        vec![Value::from("tom"), Value::from("dan")]
    }

    #[test]
    fn test_whitelist_rejection_names_value_and_set() {
        let err = whitelist(&Value::from("mike"), &names()).unwrap_err();
        assert_eq!(err.to_string(), "mike not in (tom, dan)");
        assert!(whitelist(&Value::from("dan"), &names()).is_ok());
    }

    #[test]
    fn test_blacklist() {
        assert!(blacklist(&Value::from("mike"), &names()).is_ok());
        let err = blacklist(&Value::from("tom"), &names()).unwrap_err();
        assert_eq!(err.to_string(), "tom in (tom, dan)");
    }

    #[rstest]
    #[case(Value::Int(3), Value::Float(3.0), true)]
    #[case(Value::Uint(3), Value::Int(3), true)]
    #[case(Value::Float(2.5), Value::Float(2.5), true)]
    #[case(Value::Int(3), Value::from("3"), false)]
    #[case(Value::Bool(true), Value::Bool(true), true)]
    #[case(Value::Int(1), Value::Bool(true), false)]
    #[case(Value::Int(9_007_199_254_740_992), Value::Int(9_007_199_254_740_993), false)]
    #[case(Value::Uint(9_007_199_254_740_993), Value::Int(9_007_199_254_740_993), true)]
    #[case(Value::Uint(u64::MAX), Value::Int(-1), false)]
    fn test_numeric_normalisation(#[case] value: Value, #[case] arg: Value, #[case] member: bool) {
        assert_eq!(whitelist(&value, &[arg.clone()]).is_ok(), member);
        assert_eq!(blacklist(&value, &[arg]).is_ok(), !member);
    }

    #[test]
    fn test_empty_set() {
        assert!(whitelist(&Value::from("x"), &[]).is_err());
        assert!(blacklist(&Value::from("x"), &[]).is_ok());
    }
}
