//! Parse errors

use crate::span::Span;
use crate::token::Token;
use thiserror::Error;

/// Result type for scanning and parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// A rule string that could not be parsed.
///
/// Parsing is fail-fast, so a single error describes the first offending
/// token. `pos` is a character offset into the rule string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", self.render())]
pub struct ParseError {
    /// Free-form description, used instead of `found`/`expected` when set
    pub message: Option<String>,
    /// Text of the offending token
    pub found: String,
    /// Tokens that would have been accepted
    pub expected: Vec<String>,
    /// Character offset of the offending token
    pub pos: usize,
}

impl ParseError {
    /// Create an "unexpected token" error
    pub fn unexpected(found: impl Into<String>, expected: &[&str], pos: usize) -> Self {
        Self {
            message: None,
            found: found.into(),
            expected: expected.iter().map(|s| (*s).to_string()).collect(),
            pos,
        }
    }

    /// Create an error with a custom message
    pub fn message(message: impl Into<String>, pos: usize) -> Self {
        Self {
            message: Some(message.into()),
            found: String::new(),
            expected: Vec::new(),
            pos,
        }
    }

    /// Create an "unexpected token" error for `token` within `source`
    pub(crate) fn at_token(token: &Token<'_>, expected: &[&str], source: &str) -> Self {
        Self::unexpected(token.describe(), expected, token.span.char_offset(source))
    }

    /// Create a custom-message error located at `span` within `source`
    pub(crate) fn at_span(message: impl Into<String>, span: Span, source: &str) -> Self {
        Self::message(message, span.char_offset(source))
    }

    fn render(&self) -> String {
        match &self.message {
            Some(message) => format!("{message} at char {}", self.pos + 1),
            None => format!(
                "found {}, expected {} at char {}",
                self.found,
                self.expected.join(", "),
                self.pos + 1
            ),
        }
    }
}
