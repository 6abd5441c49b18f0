//! Abstract Syntax Tree (AST) node types
//!
//! This module defines the expression tree produced by the parser. Every
//! node renders back to rule text through `Display`; re-parsing that text
//! yields a structurally equal tree, except that decimal literals render
//! with three fixed decimals.

use regex::Regex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// An expression node in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Binary combinator (left op right)
    Binary {
        /// Combinator
        op: BinaryOp,
        /// Evaluated first
        left: Box<Expr>,
        /// Skipped when `left` decides the outcome
        right: Box<Expr>,
    },

    /// Parenthesized group, transparent to evaluation
    Paren(Box<Expr>),

    /// Logical NOT (`!expr`, `NOT expr`)
    Negative(Box<Expr>),

    /// Apply the inner expression to every element (`EACH(expr)`)
    Each(Box<Expr>),

    /// Named validation call; a bare identifier is a call with no arguments
    Call {
        /// Lowercase validation name
        name: Arc<str>,
        /// Literal and bound-param arguments in source order
        args: Vec<Expr>,
    },

    /// Reference to another field of the record (`$.Book.Title`)
    BoundParam(Arc<str>),

    /// Literal argument value
    Literal(Literal),
}

/// Binary combinators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Both sides must pass
    And,
    /// Either side must pass
    Or,
}

impl BinaryOp {
    /// Get a human-readable name for the operator
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal with its decoded native value
#[derive(Debug, Clone)]
pub enum Literal {
    /// Single-quoted string with escapes decoded
    String(String),
    /// `true` / `false`
    Bool(bool),
    /// Decimal literal; renders with three fixed decimals
    Number(f64),
    /// Integer literal
    Integer(i64),
    /// Integer with a unit suffix
    Duration(Duration),
    /// Compiled at parse time
    Regex(Regex),
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::String(a), Literal::String(b)) => a == b,
            (Literal::Bool(a), Literal::Bool(b)) => a == b,
            (Literal::Number(a), Literal::Number(b)) => a == b,
            (Literal::Integer(a), Literal::Integer(b)) => a == b,
            (Literal::Duration(a), Literal::Duration(b)) => a == b,
            (Literal::Regex(a), Literal::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Literal {
    /// Name of the literal kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "string",
            Literal::Bool(_) => "bool",
            Literal::Number(_) => "number",
            Literal::Integer(_) => "integer",
            Literal::Duration(_) => "duration",
            Literal::Regex(_) => "regex",
        }
    }
}

// Largest unit first so rendering picks the coarsest exact unit.
const DURATION_UNITS: &[(&str, u128)] = &[
    ("w", 7 * 24 * 3_600 * 1_000_000_000),
    ("d", 24 * 3_600 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("s", 1_000_000_000),
    ("ms", 1_000_000),
    ("us", 1_000),
    ("ns", 1),
];

fn write_duration(f: &mut fmt::Formatter<'_>, d: Duration) -> fmt::Result {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return f.write_str("0s");
    }
    for (unit, size) in DURATION_UNITS {
        if nanos % size == 0 {
            return write!(f, "{}{unit}", nanos / size);
        }
    }
    write!(f, "{nanos}ns")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                f.write_str("'")?;
                for ch in s.chars() {
                    match ch {
                        '\n' => f.write_str("\\n")?,
                        '\\' => f.write_str("\\\\")?,
                        '\'' => f.write_str("\\'")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n:.3}"),
            Literal::Integer(i) => write!(f, "{i}"),
            Literal::Duration(d) => write_duration(f, *d),
            Literal::Regex(re) => write!(f, "/{}/", re.as_str().replace('/', "\\/")),
        }
    }
}

impl Expr {
    /// Build a call node; the name is lowercased
    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: Arc::from(name.to_lowercase()),
            args,
        }
    }

    /// Build `left AND right`
    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op: BinaryOp::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build `left OR right`
    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op: BinaryOp::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build `NOT inner`
    pub fn negative(inner: Expr) -> Self {
        Expr::Negative(Box::new(inner))
    }

    /// Build `(inner)`
    pub fn paren(inner: Expr) -> Self {
        Expr::Paren(Box::new(inner))
    }

    /// Build `EACH(inner)`
    pub fn each(inner: Expr) -> Self {
        Expr::Each(Box::new(inner))
    }

    /// Build `$.path`
    pub fn bound(path: &str) -> Self {
        Expr::BoundParam(Arc::from(path))
    }

    /// Try to extract a literal value if this is a literal expression
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Expr::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Name of the node variant, used in error messages and tracing
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Binary { .. } => "binary",
            Expr::Paren(_) => "paren",
            Expr::Negative(_) => "negative",
            Expr::Each(_) => "each",
            Expr::Call { .. } => "call",
            Expr::BoundParam(_) => "bound param",
            Expr::Literal(_) => "literal",
        }
    }
}

impl From<Literal> for Expr {
    fn from(lit: Literal) -> Self {
        Expr::Literal(lit)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { op, left, right } => write!(f, "{left} {op} {right}"),
            Expr::Paren(inner) => write!(f, "({inner})"),
            Expr::Negative(inner) => write!(f, "NOT {inner}"),
            Expr::Each(inner) => write!(f, "EACH({inner})"),
            Expr::Call { name, args } if args.is_empty() => f.write_str(name),
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::BoundParam(path) => write!(f, "$.{path}"),
            Expr::Literal(lit) => write!(f, "{lit}"),
        }
    }
}
