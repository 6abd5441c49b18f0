//! Ordered comparisons: `lt`, `lte`, `gt`, `gte`
//!
//! Numeric fields compare as `f64` against numeric thresholds. Duration
//! fields compare against duration thresholds or integer nanoseconds. With
//! several thresholds the relation must hold for every one of them.

use super::check_min_arg_count;
use crate::error::{RuleError, RuleResult};
use crate::value::Value;
use std::cmp::Ordering;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Comparison {
    fn name(self) -> &'static str {
        match self {
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Self::Lt => "less than",
            Self::Lte => "less than or equal to",
            Self::Gt => "greater than",
            Self::Gte => "greater than or equal to",
        }
    }

    /// `None` (unordered, e.g. NaN) never satisfies a comparison
    fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => false,
            (Self::Lt, Some(o)) => o == Ordering::Less,
            (Self::Lte, Some(o)) => o != Ordering::Greater,
            (Self::Gt, Some(o)) => o == Ordering::Greater,
            (Self::Gte, Some(o)) => o != Ordering::Less,
        }
    }

    fn check(self, value: &Value, args: &[Value]) -> RuleResult<()> {
        check_min_arg_count(self.name(), args, 1)?;

        if let Some(n) = value.as_f64() {
            let thresholds = self.numbers(args)?;
            return self.check_all(value, &thresholds, |t| n.partial_cmp(t));
        }

        if let Some(d) = value.as_duration() {
            let thresholds = self.durations(args)?;
            return self.check_all(value, &thresholds, |t| Some(d.cmp(&t.0)));
        }

        Err(RuleError::incompatible(format!(
            "{} expects a numeric field type or a duration, got {value}",
            self.name()
        )))
    }

    fn check_all<T: std::fmt::Display>(
        self,
        value: &Value,
        thresholds: &[T],
        compare: impl Fn(&T) -> Option<Ordering>,
    ) -> RuleResult<()> {
        match thresholds.iter().find(|t| !self.holds(compare(*t))) {
            None => Ok(()),
            Some(t) => Err(RuleError::invalid(format!(
                "expected {value} to be {} {t}",
                self.phrase()
            ))),
        }
    }

    fn numbers(self, args: &[Value]) -> RuleResult<Vec<f64>> {
        args.iter()
            .map(|arg| {
                arg.as_f64().ok_or_else(|| {
                    RuleError::invalid_argument(
                        self.name(),
                        format!("expected a numeric threshold, got {} {arg}", arg.type_name()),
                    )
                })
            })
            .collect()
    }

    fn durations(self, args: &[Value]) -> RuleResult<Vec<DurationArg>> {
        args.iter()
            .map(|arg| {
                let d = match arg {
                    Value::Duration(d) => Some(*d),
                    Value::Int(_) | Value::Uint(_) => {
                        arg.as_i64().and_then(|n| u64::try_from(n).ok()).map(Duration::from_nanos)
                    }
                    _ => None,
                };
                d.map(DurationArg).ok_or_else(|| {
                    RuleError::invalid_argument(
                        self.name(),
                        format!("expected a duration threshold, got {} {arg}", arg.type_name()),
                    )
                })
            })
            .collect()
    }
}

/// Threshold rendered the way rule text writes durations
#[derive(Debug, Clone, Copy)]
struct DurationArg(Duration);

impl std::fmt::Display for DurationArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Value::Duration(self.0))
    }
}

/// Passes when `value` is less than every threshold
pub fn lt(value: &Value, args: &[Value]) -> RuleResult<()> {
    Comparison::Lt.check(value, args)
}

/// Passes when `value` is less than or equal to every threshold
pub fn lte(value: &Value, args: &[Value]) -> RuleResult<()> {
    Comparison::Lte.check(value, args)
}

/// Passes when `value` is greater than every threshold
pub fn gt(value: &Value, args: &[Value]) -> RuleResult<()> {
    Comparison::Gt.check(value, args)
}

/// Passes when `value` is greater than or equal to every threshold
pub fn gte(value: &Value, args: &[Value]) -> RuleResult<()> {
    Comparison::Gte.check(value, args)
}
