//! End-to-end rule evaluation through the public API

use pretty_assertions::assert_eq;
use regex::Regex;
use ruletag_validate::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn field_errors(result: RuleResult<()>) -> Vec<FieldError> {
    let err = result.expect_err("expected validation to fail");
    assert!(err.is_failure(), "expected a failure, got {err:?}");
    err.into_field_errors()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_required_on_empty_string() {
    let errors = field_errors(validate_value(&Value::from(""), "required"));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, "required");
    let cause = errors[0].cause().expect("cause").to_string();
    assert!(cause.contains("not to be nil"), "{cause}");
}

#[test]
fn test_len_and_each_len() {
    let rule = "len(3),each(len(2))";
    assert!(validate_value(&Value::from(vec!["a1", "b2", "c3"]), rule).is_ok());

    let errors = field_errors(validate_value(&Value::from(vec!["a1", "b2"]), rule));
    assert_eq!(errors[0].rule, "len(3)");

    let errors = field_errors(validate_value(&Value::from(vec!["a1", "b2", "c34"]), rule));
    assert_eq!(errors[0].rule, "len(2)");
    assert!(errors[0].to_string().contains("c34"));
}

#[test]
fn test_whitelist_names_value_and_set() {
    let errors = field_errors(validate_value(&Value::from("mike"), "whitelist('tom','dan')"));
    let message = errors[0].to_string();
    assert_eq!(
        message,
        "value failed the 'whitelist('tom', 'dan')' validation: mike not in (tom, dan)"
    );
}

#[test]
fn test_match_against_sibling_pattern() {
    let pattern = Regex::new(r"^\d+$").unwrap();

    let ok = Record::new()
        .with("Regexp", pattern.clone())
        .with_rule("Value", "123345", "match($.Regexp)");
    assert!(validate_record(&ok).is_ok());

    let bad = Record::new()
        .with("Regexp", pattern)
        .with_rule("Value", "123a345", "match($.Regexp)");
    let errors = field_errors(validate_record(&bad));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "Value");
    assert_eq!(errors[0].rule, "match($.Regexp)");
}

#[test]
fn test_regex_literal_argument() {
    assert!(validate_value(&Value::from("abc"), r"match(/^[a-z]+$/)").is_ok());
    assert!(validate_value(&Value::from("ab/c"), r"match(/^[a-z\/]+$/)").is_ok());
    assert!(validate_value(&Value::from("ABC"), r"match(/^[a-z]+$/)").is_err());
}

// ============================================================================
// SHORT-CIRCUIT
// ============================================================================

fn counting_validator(counter: &Arc<AtomicUsize>) -> Validator {
    let counter = Arc::clone(counter);
    Validator::builder()
        .validation("touch", move |_: &Value, _: &[Value]| -> RuleResult<()> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .build()
}

#[test]
fn test_and_skips_right_after_failure() {
    let counter = Arc::new(AtomicUsize::new(0));
    let validator = counting_validator(&counter);

    assert!(validator.validate_value(&Value::from(""), "required AND touch").is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert!(validator.validate_value(&Value::from("x"), "required AND touch").is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_or_skips_right_after_success() {
    let counter = Arc::new(AtomicUsize::new(0));
    let validator = counting_validator(&counter);

    assert!(validator.validate_value(&Value::from("x"), "required | touch").is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    assert!(validator.validate_value(&Value::from(""), "required | touch").is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_each_stops_at_first_failing_element() {
    let counter = Arc::new(AtomicUsize::new(0));
    let validator = counting_validator(&counter);

    let value = Value::from(vec!["a", "", "b", "c"]);
    assert!(validator.validate_value(&value, "each(required AND touch)").is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_or_binds_tighter_than_and() {
    assert!(validate_value(&Value::from("ab"), "required,len(3)|len(2)").is_ok());
    // Read as (required AND len(0)) OR nil this would pass.
    assert!(validate_value(&Value::from(""), "required,len(0)|nil").is_err());
}

#[test]
fn test_long_flat_rule_validates() {
    let rule = vec!["required"; 300].join(",");
    assert!(validate_value(&Value::from("x"), &rule).is_ok());
    let errors = field_errors(validate_value(&Value::from(""), &rule));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, "required");
}

#[test]
fn test_large_integers_are_not_rounded() {
    let value = Value::Int(9_007_199_254_740_992);
    assert!(validate_value(&value, "whitelist(9007199254740993)").is_err());
    assert!(validate_value(&value, "blacklist(9007199254740993)").is_ok());
    assert!(validate_value(&value, "whitelist(9007199254740992)").is_ok());
}

// ============================================================================
// RECORDS
// ============================================================================

fn account() -> Record {
    let address = Record::new()
        .with_rule("Street", "", "required")
        .with_rule("Zip", "1234", "len(5)");

    Record::new()
        .with_rule("Name", "", "required")
        .with_rule("Age", 17i64, "gte(18)")
        .with_rule("Email", "tom@example.com", "required")
        .with_rule("Address", address, "required")
}

#[test]
fn test_record_failures_are_aggregated() {
    let err = validate_record(&account()).unwrap_err();
    assert_eq!(err.code(), "RULE:FIELDS");

    let fields: Vec<_> = err.into_field_errors().into_iter().map(|e| e.field).collect();
    assert_eq!(fields, vec!["Name", "Age", "Street", "Zip"]);
}

#[test]
fn test_aggregate_display_joins_errors() {
    let record = Record::new()
        .with_rule("A", "", "required")
        .with_rule("B", "xx", "len(1)");
    let err = validate_record(&record).unwrap_err();
    assert_eq!(
        err.to_string(),
        "A failed the 'required' validation: expected  not to be nil; \
         B failed the 'len(1)' validation: expected xx to have length 1, got 2"
    );
}

#[test]
fn test_skip_marker_exempts_nested_record() {
    let nested = Record::new().with_rule("Inner", "", "required");
    let record = Record::new().with_rule("Nested", nested.clone(), "-");
    assert!(validate_record(&record).is_ok());

    let record = Record::new().with("Nested", nested);
    assert_eq!(field_errors(validate_record(&record))[0].field, "Inner");
}

#[test]
fn test_nested_bound_param_resolves_within_nested_record() {
    let limits = Record::new()
        .with("Max", 10i64)
        .with_rule("Value", 11i64, "lte($.Max)");
    let record = Record::new().with_rule("Limits", limits, "-");
    assert!(validate_record(&record).is_ok());

    let limits = Record::new()
        .with("Max", 10i64)
        .with_rule("Value", 11i64, "lte($.Max)");
    let record = Record::new().with("Limits", limits);
    let errors = field_errors(validate_record(&record));
    assert_eq!(errors[0].field, "Value");
}

#[test]
fn test_dotted_bound_param_from_parent() {
    let record = Record::new()
        .with("Limits", Record::new().with("Max", Duration::from_secs(60)))
        .with_rule("Timeout", Duration::from_secs(30), "lt($.Limits.Max)");
    assert!(validate_record(&record).is_ok());

    let record = Record::new()
        .with("Limits", 5i64)
        .with_rule("Timeout", Duration::from_secs(30), "lt($.Limits.Max)");
    assert_eq!(validate_record(&record).unwrap_err().code(), "RULE:INCOMPATIBLE");
}

#[test]
fn test_parse_error_aborts_record() {
    let record = Record::new()
        .with_rule("A", "", "required")
        .with_rule("B", "x", "len(");
    let err = validate_record(&record).unwrap_err();
    assert_eq!(err.code(), "RULE:PARSE");
    assert!(!err.is_failure());
}

#[test]
fn test_rule_required() {
    let validator = Validator::builder().rule_required(true).build();

    let record = Record::new()
        .with_rule("A", "x", "required")
        .with("B", "y");
    assert_eq!(
        validator.validate_record(&record).unwrap_err().code(),
        "RULE:MISSING"
    );

    let record = Record::new()
        .with_rule("A", "x", "required")
        .with_rule("B", "y", "-");
    assert!(validator.validate_record(&record).is_ok());

    assert_eq!(
        validator.validate_value(&Value::from("x"), "").unwrap_err().code(),
        "RULE:MISSING"
    );
    assert!(validator.validate_value(&Value::from(""), "-").is_ok());
}

#[test]
fn test_rules_are_optional_by_default() {
    let record = Record::new().with("A", "").with_rule("B", "", "");
    assert!(validate_record(&record).is_ok());
}

// ============================================================================
// CONFIGURATION AND EXTENSION
// ============================================================================

#[test]
fn test_custom_skip_marker() {
    let config = ValidatorConfig {
        skip_marker: "skip".to_string(),
        ..ValidatorConfig::default()
    };
    let validator = Validator::with_config(config);
    assert!(validator.validate_value(&Value::from(""), "skip").is_ok());
    // "-" is no longer special and does not parse as a rule.
    assert_eq!(
        validator.validate_value(&Value::from(""), "-").unwrap_err().code(),
        "RULE:PARSE"
    );
}

#[test]
fn test_config_from_json() {
    let config: ValidatorConfig =
        serde_json::from_str(r#"{"rule_required": true, "cache_capacity": 0}"#).unwrap();
    let validator = Validator::with_config(config);
    assert!(validator.config().rule_required);
    assert!(validator.parse("required").is_ok());
    assert_eq!(validator.cache_entries(), 0);
}

#[test]
fn test_custom_validation_with_arguments() {
    let validator = Validator::builder()
        .validation(
            "prefix",
            StringFn(|s: &str| -> RuleResult<()> {
                if s.starts_with("acct_") {
                    Ok(())
                } else {
                    Err(RuleError::invalid(format!("{s} has no acct_ prefix")))
                }
            }),
        )
        .validation(
            "between",
            IntArgsFn("between", |value: &Value, args: &[i64]| -> RuleResult<()> {
                let n = value
                    .as_i64()
                    .ok_or_else(|| RuleError::incompatible("between needs an integer"))?;
                match args {
                    [lo, hi] if (*lo..=*hi).contains(&n) => Ok(()),
                    [lo, hi] => Err(RuleError::invalid(format!("{n} not in {lo}..={hi}"))),
                    _ => Err(RuleError::invalid_argument("between", "expected 2 arguments")),
                }
            }),
        )
        .build();

    assert!(validator.validations().contains("PREFIX"));
    assert!(validator.validate_value(&Value::from("acct_1"), "Prefix").is_ok());
    assert!(validator.validate_value(&Value::from("user_1"), "prefix").is_err());
    assert!(validator.validate_value(&Value::Int(5), "between(1, 10)").is_ok());

    let errors = field_errors(validator.validate_value(&Value::Int(50), "between(1, 10)"));
    assert_eq!(errors[0].rule, "between(1, 10)");
}

#[test]
fn test_custom_value_capabilities() {
    #[derive(Debug)]
    struct Urn(Option<String>);

    impl CustomValue for Urn {
        fn type_name(&self) -> &str {
            "urn"
        }

        fn is_nil(&self) -> Option<bool> {
            Some(self.0.is_none())
        }

        fn len(&self) -> Option<usize> {
            self.0.as_ref().map(String::len)
        }
    }

    let set = Value::Custom(Arc::new(Urn(Some("urn:a".to_string()))));
    let unset = Value::Custom(Arc::new(Urn(None)));

    assert!(validate_value(&set, "required,len(5)").is_ok());
    assert!(validate_value(&unset, "nil").is_ok());
    assert!(validate_value(&unset, "required").is_err());
    assert_eq!(
        validate_value(&unset, "len(5)").unwrap_err().into_field_errors()[0]
            .cause()
            .map(RuleError::code),
        Some("RULE:INCOMPATIBLE")
    );
}

#[test]
fn test_json_document_as_record() {
    let json = serde_json::json!({
        "name": "tom",
        "tags": ["a1", "b2"],
        "limits": {"max": 3}
    });
    let Value::Record(record) = Value::from(json) else {
        panic!("object should convert to a record");
    };

    let validator = Validator::new();
    let errors = validator
        .evaluate_field("tags", "each(len(2)),len($.limits.max)", record.get("tags").unwrap(), &record)
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, "len($.limits.max)");
}

#[test]
fn test_durations_compare_against_literals() {
    let value = Value::from(Duration::from_secs(90));
    assert!(validate_value(&value, "gt(1m),lt(2m)").is_ok());
    assert!(validate_value(&value, "gte(90s),lte(1m)").is_err());
}

#[test]
fn test_rfc3339() {
    assert!(validate_value(&Value::from("2019-10-12T07:20:50.52Z"), "rfc3339").is_ok());
    assert!(validate_value(&Value::from("2019-10-12"), "rfc3339").is_err());
    assert_eq!(
        validate_value(&Value::Int(1), "rfc3339").unwrap_err().into_field_errors()[0]
            .cause()
            .map(RuleError::code),
        Some("RULE:INCOMPATIBLE")
    );
}

#[test]
fn test_unknown_function_is_fatal() {
    let err = validate_value(&Value::from("x"), "required,frobnicate").unwrap_err();
    assert_eq!(err.code(), "RULE:UNKNOWN_FUNC");
}
