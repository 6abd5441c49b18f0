//! Token types for the rule scanner
//!
//! This module defines the token vocabulary, the keyword/operator synonym
//! table and operator precedence.

use crate::span::Span;
use std::borrow::Cow;

/// A token with its source position and literal text.
///
/// The literal is borrowed from the input unless the scanner had to decode
/// escapes or normalise line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token kind
    pub kind: TokenKind,
    /// Source span for this token
    pub span: Span,
    /// Literal text; empty for punctuation and operators
    pub literal: Cow<'a, str>,
}

impl<'a> Token<'a> {
    /// Create a token that carries no literal text
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            literal: Cow::Borrowed(""),
        }
    }

    /// Create a token carrying literal text
    pub fn with_literal(kind: TokenKind, span: Span, literal: impl Into<Cow<'a, str>>) -> Self {
        Self {
            kind,
            span,
            literal: literal.into(),
        }
    }

    /// The literal if present, otherwise the token's display name.
    ///
    /// Used for the `found ...` part of parse errors.
    pub fn describe(&self) -> String {
        if self.literal.is_empty() {
            self.kind.to_string()
        } else {
            self.literal.to_string()
        }
    }
}

/// The kind of token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    /// Character that starts no valid token
    Illegal,
    /// End of input
    Eof,
    /// Run of whitespace
    Whitespace,

    // Literals
    /// Validation name (e.g. `required`)
    Ident,
    /// Reference to another field (`$Title`, `$.Book.Title`)
    BoundParam,
    /// Decimal literal (`12.3`, `.5`)
    Number,
    /// Integer literal (`12`)
    Integer,
    /// Integer with a unit suffix (`15m`); unit is checked by the parser
    Duration,
    /// Single-quoted string
    String,
    /// Unterminated string
    BadString,
    /// `true`
    True,
    /// `false`
    False,
    /// `/pattern/`
    Regex,
    /// Unknown escape sequence in a string or regex
    BadEscape,
    /// Unterminated regex
    BadRegex,

    // Punctuation
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    // Operators
    /// `OR`, `|`
    Or,
    /// `AND`, `&&`
    And,
    /// `NOT`, `!`
    Not,

    // Keywords
    /// `EACH`
    Each,
}

/// Words and symbols that scan to operator or keyword tokens.
///
/// Matching is case-insensitive. The comma is listed as an `AND` synonym
/// for documentation purposes only: the scanner always emits
/// [`TokenKind::Comma`] and the parser decides whether it means `AND`.
pub const SYNONYMS: &[(TokenKind, &[&str])] = &[
    (TokenKind::Or, &["or", "|"]),
    (TokenKind::And, &["and", "&&", ","]),
    (TokenKind::Not, &["not", "!"]),
    (TokenKind::Each, &["each"]),
    (TokenKind::True, &["true"]),
    (TokenKind::False, &["false"]),
];

/// Look up an identifier in the keyword table.
///
/// Returns [`TokenKind::Ident`] when `ident` is not a keyword.
pub fn lookup(ident: &str) -> TokenKind {
    SYNONYMS
        .iter()
        .find(|(_, words)| words.iter().any(|w| w.eq_ignore_ascii_case(ident)))
        .map_or(TokenKind::Ident, |(kind, _)| *kind)
}

impl TokenKind {
    /// Get the precedence of this operator (higher number binds tighter)
    ///
    /// `OR` binds tighter than `AND`, so `a,b|c,d` reads as
    /// `a AND (b OR c) AND d`. A comma only reaches the precedence table
    /// outside call arguments, where it means `AND`.
    pub fn precedence(&self) -> u8 {
        match self {
            TokenKind::Or => 2,
            TokenKind::And | TokenKind::Comma => 1,
            _ => 0,
        }
    }

    /// Name used in `Display` and in parse error messages
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Whitespace => "WS",
            TokenKind::Ident => "IDENT",
            TokenKind::BoundParam => "BOUNDPARAM",
            TokenKind::Number => "NUMBER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Duration => "DURATION",
            TokenKind::String => "STRING",
            TokenKind::BadString => "BADSTRING",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Regex => "REGEX",
            TokenKind::BadEscape => "BADESCAPE",
            TokenKind::BadRegex => "BADREGEX",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::Not => "NOT",
            TokenKind::Each => "EACH",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}
