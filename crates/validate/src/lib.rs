//! # ruletag-validate
//!
//! Evaluates validation rules written in the `ruletag-lang` rule language
//! against values and records.
//!
//! ## Quick Start
//!
//! ```rust
//! use ruletag_validate::{Record, Validator, Value};
//!
//! let validator = Validator::new();
//! assert!(validator.validate_value(&Value::from("tom"), "required,whitelist('tom','dan')").is_ok());
//!
//! let account = Record::new()
//!     .with_rule("Name", "", "required")
//!     .with_rule("Age", 12i64, "gte(18)");
//!
//! let err = validator.validate_record(&account).unwrap_err();
//! assert_eq!(err.into_field_errors().len(), 2);
//! ```
//!
//! ## Built-in validations
//!
//! - `required` / `nil` - value is (not) its kind's zero value
//! - `len(n)` - exact length of a string (in chars), list or record
//! - `whitelist(a, ...)` / `blacklist(a, ...)` - membership
//! - `match(/re/)` - string matches a regex
//! - `lt`, `lte`, `gt`, `gte` - numeric or duration comparison against every threshold
//! - `rfc3339` - string is an RFC 3339 timestamp
//!
//! Custom validations are registered on [`ValidatorBuilder`]:
//!
//! ```rust
//! use ruletag_validate::{RuleError, RuleResult, Validator, Value};
//! use ruletag_validate::registry::StringFn;
//!
//! let validator = Validator::builder()
//!     .validation("lowercase", StringFn(|s: &str| -> RuleResult<()> {
//!         if s.chars().all(|c| !c.is_uppercase()) {
//!             Ok(())
//!         } else {
//!             Err(RuleError::invalid(format!("{s} is not lowercase")))
//!         }
//!     }))
//!     .build();
//!
//! assert!(validator.validate_value(&Value::from("abc"), "lowercase").is_ok());
//! assert!(validator.validate_value(&Value::from("aBc"), "lowercase").is_err());
//! ```

pub mod builtins;
pub mod config;
pub mod error;
pub mod eval;
pub mod record;
pub mod registry;
pub mod validator;
pub mod value;

// Re-exports
pub use config::ValidatorConfig;
pub use error::{FieldError, FieldErrors, RuleError, RuleResult};
pub use eval::{Evaluator, MAX_RECURSION_DEPTH};
pub use record::{Field, FieldResolver, NoRecord, Record};
pub use registry::{Validation, Validations};
pub use validator::{Validator, ValidatorBuilder, validate_record, validate_value};
pub use value::{CustomValue, Value, ValueKind};

// Re-export the rule language for callers that parse ahead of time
pub use ruletag_lang::{Expr, ParseError, parse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::ValidatorConfig;
    pub use crate::error::{FieldError, FieldErrors, RuleError, RuleResult};
    pub use crate::record::{FieldResolver, NoRecord, Record};
    pub use crate::registry::{BoolFn, IntArgsFn, SimpleFn, StringFn, Validation, Validations};
    pub use crate::validator::{Validator, ValidatorBuilder, validate_record, validate_value};
    pub use crate::value::{CustomValue, Value};
}
