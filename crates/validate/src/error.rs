//! Error types for rule evaluation
//!
//! Two families share [`RuleError`]:
//!
//! - **failures** (`Field`, `Fields`): a value broke a rule. These are
//!   expected outcomes and are aggregated across fields.
//! - **fatal errors** (everything else): the rule itself, the registry or the
//!   record is broken. These abort validation immediately.

use ruletag_lang::ParseError;
use std::fmt;
use thiserror::Error;

/// Result type for rule evaluation
pub type RuleResult<T> = Result<T, RuleError>;

/// Rule evaluation errors
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RuleError {
    /// Expression node that cannot be evaluated as a rule
    #[error("unknown expression: {expr}")]
    UnknownExpression { expr: String },

    /// A field carries no rule while rules are required
    #[error("missing required validation rule")]
    MissingRule,

    /// Wrong kind or number of arguments supplied to a validation
    #[error("invalid param type: {function}: {message}")]
    InvalidArgumentType { function: String, message: String },

    /// Validation applied to a value kind it cannot handle
    #[error("incompatible field type: {message}")]
    IncompatibleValueType { message: String },

    /// Rule calls a name the registry does not know
    #[error("unknown validation function: {name}")]
    UnknownValidationFunction { name: String },

    /// Registry lookup miss
    #[error("validation not found: {name}")]
    ValidationNotFound { name: String },

    /// Rule text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation nested deeper than the evaluator allows
    #[error("maximum recursion depth ({limit}) exceeded")]
    RecursionLimit { limit: usize },

    /// Plain failure message returned by a validation function
    #[error("{message}")]
    Invalid { message: String },

    /// A single field failed its rule
    #[error(transparent)]
    Field(Box<FieldError>),

    /// Several fields failed their rules
    #[error(transparent)]
    Fields(FieldErrors),
}

impl RuleError {
    /// Get error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownExpression { .. } => "RULE:UNKNOWN_EXPR",
            Self::MissingRule => "RULE:MISSING",
            Self::InvalidArgumentType { .. } => "RULE:INVALID_ARG",
            Self::IncompatibleValueType { .. } => "RULE:INCOMPATIBLE",
            Self::UnknownValidationFunction { .. } => "RULE:UNKNOWN_FUNC",
            Self::ValidationNotFound { .. } => "RULE:NOT_FOUND",
            Self::Parse(_) => "RULE:PARSE",
            Self::RecursionLimit { .. } => "RULE:DEPTH",
            Self::Invalid { .. } => "RULE:INVALID",
            Self::Field(_) => "RULE:FIELD",
            Self::Fields(_) => "RULE:FIELDS",
        }
    }

    /// Check if this error is a validation failure rather than a fatal error
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Field(_) | Self::Fields(_))
    }

    /// Flatten a failure into its field errors.
    ///
    /// Fatal errors have no field errors and yield an empty list.
    pub fn into_field_errors(self) -> Vec<FieldError> {
        match self {
            Self::Field(err) => vec![*err],
            Self::Fields(errs) => errs.into_iter().collect(),
            _ => Vec::new(),
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create a plain validation failure
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgumentType {
            function: function.into(),
            message: message.into(),
        }
    }

    /// Create an incompatible value type error
    pub fn incompatible(message: impl Into<String>) -> Self {
        Self::IncompatibleValueType {
            message: message.into(),
        }
    }

    /// Create an unknown validation function error
    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownValidationFunction { name: name.into() }
    }

    /// Create a validation not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::ValidationNotFound { name: name.into() }
    }

    /// Create an unknown expression error
    pub fn unknown_expression(expr: impl Into<String>) -> Self {
        Self::UnknownExpression { expr: expr.into() }
    }
}

impl From<FieldError> for RuleError {
    fn from(err: FieldError) -> Self {
        Self::Field(Box::new(err))
    }
}

impl From<FieldErrors> for RuleError {
    fn from(errs: FieldErrors) -> Self {
        Self::Fields(errs)
    }
}

// ============================================================================
// FIELD ERROR
// ============================================================================

/// A field that failed a rule.
///
/// `cause` is absent when there is nothing more to say, e.g. a `NOT` whose
/// inner rule passed.
#[derive(Debug, Clone)]
pub struct FieldError {
    /// Name of the field that failed
    pub field: String,
    /// Rendered text of the rule (or sub-rule) that failed
    pub rule: String,
    /// Error returned by the validation function
    pub cause: Option<Box<RuleError>>,
}

impl FieldError {
    /// Create a field error without a cause
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            cause: None,
        }
    }

    /// Attach the underlying error
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cause(mut self, cause: RuleError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The underlying error, if any
    pub fn cause(&self) -> Option<&RuleError> {
        self.cause.as_deref()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed the '{}' validation", self.field, self.rule)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn std::error::Error + 'static))
    }
}

// ============================================================================
// FIELD ERRORS
// ============================================================================

/// Ordered collection of field errors, in field encounter order.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one field error
    pub fn add(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Number of field errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if no field failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Borrow the field errors
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Iterate over the field errors
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    /// `Ok(())` when empty, otherwise [`RuleError::Fields`]
    pub fn into_result(self) -> RuleResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(RuleError::Fields(self))
        }
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<T: IntoIterator<Item = FieldError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = FieldError>>(iter: T) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
