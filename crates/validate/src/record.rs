//! Records and bound-parameter resolution
//!
//! A [`Record`] is the field-by-field view of a structured value: each field
//! carries its value and, optionally, the rule text attached to it. Records
//! nest through [`Value::Record`].

use crate::error::{RuleError, RuleResult};
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// One named field of a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// Current value
    pub value: Value,
    /// Rule text attached to the field, if any
    pub rule: Option<String>,
}

/// Insertion-ordered set of named fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Field>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field without a rule
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value, None);
        self
    }

    /// Add a field with a rule
    pub fn with_rule(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        rule: impl Into<String>,
    ) -> Self {
        self.insert(name, value, Some(rule.into()));
        self
    }

    /// Insert or replace a field, keeping its original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>, rule: Option<String>) {
        self.fields.insert(
            name.into(),
            Field {
                value: value.into(),
                rule,
            },
        );
    }

    /// Value of a direct field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).map(|f| &f.value)
    }

    /// A direct field with its rule
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A record is zero when every field value is zero
    pub fn is_zero(&self) -> bool {
        self.fields.values().all(|f| f.value.is_zero())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, field)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}:{}", field.value)?;
        }
        f.write_str("}")
    }
}

// ============================================================================
// RESOLVERS
// ============================================================================

/// Resolves the dotted path of a bound parameter (`$.Book.Title`) to a value.
pub trait FieldResolver {
    /// Look up `path`, e.g. `"Book.Title"`
    fn resolve(&self, path: &str) -> RuleResult<Value>;
}

/// Walks nested records one segment at a time.
impl FieldResolver for Record {
    fn resolve(&self, path: &str) -> RuleResult<Value> {
        let mut current = self;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let value = current.get(segment).ok_or_else(|| {
                RuleError::incompatible(format!("no field {segment:?} while resolving ${path}"))
            })?;

            if segments.peek().is_none() {
                return Ok(value.clone());
            }

            current = value.as_record().ok_or_else(|| {
                RuleError::incompatible(format!(
                    "{segment} is a {}, not a record, while resolving ${path}",
                    value.type_name()
                ))
            })?;
        }

        Err(RuleError::incompatible(format!("empty bound parameter path ${path}")))
    }
}

/// Resolver for values validated outside any record; every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecord;

impl FieldResolver for NoRecord {
    fn resolve(&self, path: &str) -> RuleResult<Value> {
        Err(RuleError::incompatible(format!(
            "cannot resolve ${path} without a record"
        )))
    }
}

impl<F> FieldResolver for F
where
    F: Fn(&str) -> RuleResult<Value>,
{
    fn resolve(&self, path: &str) -> RuleResult<Value> {
        self(path)
    }
}
