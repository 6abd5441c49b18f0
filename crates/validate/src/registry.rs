//! Validation registry
//!
//! [`Validations`] maps case-insensitive names to [`Validation`]s. A registry
//! is assembled first (built-ins plus caller extensions) and then frozen
//! behind an `Arc` by [`ValidatorBuilder::build`](crate::ValidatorBuilder::build).

use crate::builtins;
use crate::error::{RuleError, RuleResult};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A named check applied to a value with the call's resolved arguments.
pub trait Validation: Send + Sync {
    /// Validate `value`; return a failure (any [`RuleError`]) to reject it
    fn validate(&self, value: &Value, args: &[Value]) -> RuleResult<()>;
}

impl<F> Validation for F
where
    F: Fn(&Value, &[Value]) -> RuleResult<()> + Send + Sync,
{
    fn validate(&self, value: &Value, args: &[Value]) -> RuleResult<()> {
        self(value, args)
    }
}

// ============================================================================
// Typed adapters
// ============================================================================

/// Validation that ignores its arguments
pub struct SimpleFn<F>(pub F);

impl<F> Validation for SimpleFn<F>
where
    F: Fn(&Value) -> RuleResult<()> + Send + Sync,
{
    fn validate(&self, value: &Value, _args: &[Value]) -> RuleResult<()> {
        (self.0)(value)
    }
}

/// Validation of string values; other kinds are incompatible
pub struct StringFn<F>(pub F);

impl<F> Validation for StringFn<F>
where
    F: Fn(&str) -> RuleResult<()> + Send + Sync,
{
    fn validate(&self, value: &Value, _args: &[Value]) -> RuleResult<()> {
        let s = value.as_str().ok_or_else(|| {
            RuleError::incompatible(format!("expected {value} to be a string, got {}", value.type_name()))
        })?;
        (self.0)(s)
    }
}

/// Validation of bool values; other kinds are incompatible
pub struct BoolFn<F>(pub F);

impl<F> Validation for BoolFn<F>
where
    F: Fn(bool) -> RuleResult<()> + Send + Sync,
{
    fn validate(&self, value: &Value, _args: &[Value]) -> RuleResult<()> {
        let b = value.as_bool().ok_or_else(|| {
            RuleError::incompatible(format!("expected {value} to be a bool, got {}", value.type_name()))
        })?;
        (self.0)(b)
    }
}

/// Validation whose arguments are all integers.
///
/// The first field is the name used in argument errors.
pub struct IntArgsFn<F>(pub &'static str, pub F);

impl<F> Validation for IntArgsFn<F>
where
    F: Fn(&Value, &[i64]) -> RuleResult<()> + Send + Sync,
{
    fn validate(&self, value: &Value, args: &[Value]) -> RuleResult<()> {
        let ints = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.as_i64().ok_or_else(|| {
                    RuleError::invalid_argument(
                        self.0,
                        format!("argument {} must be an integer, got {} {arg}", i + 1, arg.type_name()),
                    )
                })
            })
            .collect::<RuleResult<Vec<_>>>()?;
        (self.1)(value, &ints)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Case-insensitive registry of named validations
#[derive(Clone)]
pub struct Validations {
    entries: HashMap<String, Arc<dyn Validation>>,
}

impl Validations {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every built-in validation
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register a validation, replacing any previous one with the same name
    pub fn register(&mut self, name: &str, validation: impl Validation + 'static) -> &mut Self {
        self.register_arc(name, Arc::new(validation))
    }

    /// Register an already shared validation
    pub fn register_arc(&mut self, name: &str, validation: Arc<dyn Validation>) -> &mut Self {
        let key = name.to_lowercase();
        if self.entries.insert(key, validation).is_some() {
            debug!(name, "Replaced validation");
        }
        self
    }

    /// Copy every entry of `other` into this registry
    pub fn extend(&mut self, other: &Validations) {
        for (name, validation) in &other.entries {
            self.entries.insert(name.clone(), Arc::clone(validation));
        }
    }

    /// Look up a validation by name
    pub fn get(&self, name: &str) -> RuleResult<Arc<dyn Validation>> {
        self.entries
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| RuleError::not_found(name))
    }

    /// Check if a validation exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Validations {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Validations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validations")
            .field("names", &self.names())
            .finish()
    }
}
