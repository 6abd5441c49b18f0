//! Property-based tests for rule evaluation
//!
//! These cover the combinator laws and the zero-value duality of the
//! built-ins over generated values.

use proptest::prelude::*;
use ruletag_validate::prelude::*;
use std::time::Duration;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<u64>().prop_map(Value::Uint),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        "[a-z0-9 ]{0,8}".prop_map(Value::from),
        (0u64..10_000).prop_map(|s| Value::Duration(Duration::from_secs(s))),
    ]
}

fn any_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(2, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::List)
    })
}

/// Values `each` cannot iterate
fn non_sequence() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e9f64..1.0e9).prop_map(Value::Float),
        (0u64..10_000).prop_map(|s| Value::Duration(Duration::from_secs(s))),
    ]
}

/// Rules that never raise a fatal error on any value
fn total_rule() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("required"), Just("nil"), Just("whitelist('a', 1, true)")]
}

fn passes(value: &Value, rule: &str) -> bool {
    match validate_value(value, rule) {
        Ok(()) => true,
        Err(err) if err.is_failure() => false,
        Err(err) => panic!("unexpected fatal error for {rule}: {err}"),
    }
}

proptest! {
    #[test]
    fn prop_required_and_nil_are_dual(value in any_value()) {
        prop_assert_ne!(passes(&value, "required"), passes(&value, "nil"));
        prop_assert_eq!(passes(&value, "nil"), value.is_zero());
    }

    #[test]
    fn prop_and_is_conjunction(value in any_value(), a in total_rule(), b in total_rule()) {
        let combined = passes(&value, &format!("{a} AND {b}"));
        prop_assert_eq!(combined, passes(&value, a) && passes(&value, b));
    }

    #[test]
    fn prop_or_is_disjunction(value in any_value(), a in total_rule(), b in total_rule()) {
        let combined = passes(&value, &format!("{a} OR {b}"));
        prop_assert_eq!(combined, passes(&value, a) || passes(&value, b));
    }

    #[test]
    fn prop_not_inverts(value in any_value(), a in total_rule()) {
        prop_assert_eq!(passes(&value, &format!("NOT ({a})")), !passes(&value, a));
        prop_assert_eq!(passes(&value, &format!("NOT NOT ({a})")), passes(&value, a));
    }

    #[test]
    fn prop_parens_are_transparent(value in any_value(), a in total_rule()) {
        prop_assert_eq!(passes(&value, &format!("(({a}))")), passes(&value, a));
    }

    #[test]
    fn prop_each_rejects_non_sequences(value in non_sequence(), a in total_rule()) {
        let err = validate_value(&value, &format!("each({a})")).unwrap_err();
        prop_assert_eq!(err.code(), "RULE:INCOMPATIBLE");
        prop_assert!(!err.is_failure());
    }

    #[test]
    fn prop_len_is_exact(items in prop::collection::vec("[a-z]{1,3}", 0..12)) {
        let n = items.len() as i64;
        let value = Value::from(items);

        let exact = format!("len({n})");
        let above = format!("len({})", n + 1);
        prop_assert!(passes(&value, &exact));
        prop_assert!(!passes(&value, &above));
        if n > 0 {
            let below = format!("len({})", n - 1);
            prop_assert!(!passes(&value, &below));
        }
    }

    #[test]
    fn prop_string_len_counts_chars(s in "\\PC{0,12}") {
        let n = s.chars().count();
        let rule = format!("len({n})");
        prop_assert!(passes(&Value::from(s), &rule));
    }

    #[test]
    fn prop_thresholds_all_hold(x in -1000i64..1000, a in 0i64..1000, b in 0i64..1000) {
        let value = Value::Int(x);
        prop_assert_eq!(passes(&value, &format!("lt({a}, {b})")), x < a && x < b);
        prop_assert_eq!(passes(&value, &format!("gte({a}, {b})")), x >= a && x >= b);
    }
}
