//! # ruletag-lang
//!
//! Scanner, parser and expression tree for per-field validation rules such as
//! `required,len(3),each(match(/^[a-z]+$/))`.
//!
//! ## Quick Start
//!
//! ```rust
//! use ruletag_lang::{parse, Expr};
//!
//! let expr = parse("required,len(3)").unwrap();
//! assert!(matches!(expr, Expr::Binary { .. }));
//! assert_eq!(expr.to_string(), "required AND len(3)");
//! ```
//!
//! ## Grammar
//!
//! - Combinators: `AND` (`&&`, `,` outside call arguments), `OR` (`|`),
//!   `NOT` (`!`), `EACH(...)`, and `( ... )` grouping
//! - Calls: `name` or `name(arg, ...)`; names are case-insensitive
//! - Literals: `'string'`, `12`, `1.5`, `15m`, `true`, `false`, and `/regex/`
//!   (call arguments only)
//! - Bound parameters: `$Field` or `$.Nested.Field`
//!
//! `OR` groups tighter than `AND`: `a,b|c` reads as `a AND (b OR c)`.

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod span;
pub mod token;

// Re-exports
pub use ast::{BinaryOp, Expr, Literal};
pub use error::{ParseError, ParseResult};
pub use parser::{MAX_NESTING_DEPTH, Parser, parse, parse_duration};
pub use scanner::Scanner;
pub use span::Span;
pub use token::{SYNONYMS, Token, TokenKind, lookup};
