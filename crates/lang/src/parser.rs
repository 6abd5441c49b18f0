//! Parser for converting rule strings into an AST
//!
//! This module implements a recursive descent parser with precedence
//! climbing for the `AND`/`OR` combinators. Tokens are pulled from the
//! [`Scanner`] on demand with a single token of push-back.

use crate::ast::{BinaryOp, Expr, Literal};
use crate::error::{ParseError, ParseResult};
use crate::scanner::Scanner;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

/// Maximum nesting of groups, negations, `EACH` and call arguments
pub const MAX_NESTING_DEPTH: usize = 128;

const UNARY_EXPECTED: &[&str] = &[
    "(",
    "NOT",
    "EACH",
    "IDENT",
    "BOUNDPARAM",
    "STRING",
    "NUMBER",
    "INTEGER",
    "DURATION",
    "TRUE",
    "FALSE",
];

/// Parse a rule string into an expression tree
pub fn parse(input: &str) -> ParseResult<Expr> {
    Parser::new(input).parse()
}

/// Parser for converting a rule string into an AST
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    source: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser over a rule string
    pub fn new(source: &'a str) -> Self {
        Self {
            scanner: Scanner::new(source),
            source,
            depth: 0,
        }
    }

    /// Parse the whole input as a top-level rule
    pub fn parse(&mut self) -> ParseResult<Expr> {
        self.parse_with(false)
    }

    /// Parse the whole input, optionally as if inside a call's argument
    /// list where a bare comma separates arguments instead of meaning `AND`.
    pub fn parse_with(&mut self, inside_call: bool) -> ParseResult<Expr> {
        let expr = self.parse_expression(inside_call)?;

        let tok = self.scan_ignore_whitespace();
        if tok.kind != TokenKind::Eof {
            let expected: &[&str] = if inside_call {
                &["AND", "OR", "EOF"]
            } else {
                &["AND", ",", "OR", "EOF"]
            };
            return Err(ParseError::at_token(&tok, expected, self.source));
        }

        Ok(expr)
    }

    fn parse_expression(&mut self, inside_call: bool) -> ParseResult<Expr> {
        self.parse_binary_expression(0, inside_call)
    }

    /// Parse binary expression with precedence climbing
    fn parse_binary_expression(&mut self, min_precedence: u8, inside_call: bool) -> ParseResult<Expr> {
        let mut left = self.parse_unary_expression(inside_call)?;

        loop {
            let op_token = self.scan_ignore_whitespace();
            let op = match op_token.kind {
                TokenKind::And => BinaryOp::And,
                TokenKind::Comma if !inside_call => BinaryOp::And,
                TokenKind::Or => BinaryOp::Or,
                _ => {
                    self.scanner.unscan();
                    break;
                }
            };

            let precedence = op_token.kind.precedence();
            if precedence < min_precedence {
                self.scanner.unscan();
                break;
            }

            // Both combinators are left-associative
            let right = self.parse_binary_expression(precedence + 1, inside_call)?;

            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse a non-binary expression
    fn parse_unary_expression(&mut self, inside_call: bool) -> ParseResult<Expr> {
        let tok = self.scan_ignore_whitespace();

        match tok.kind {
            TokenKind::LParen => {
                self.enter(tok.span)?;
                let inner = self.parse_expression(false)?;
                self.expect(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::Not => {
                self.enter(tok.span)?;
                let inner = self.parse_unary_expression(inside_call)?;
                self.depth -= 1;
                Ok(Expr::Negative(Box::new(inner)))
            }
            TokenKind::Each => {
                self.enter(tok.span)?;
                self.expect(TokenKind::LParen)?;
                let inner = self.parse_expression(false)?;
                self.expect(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(Expr::Each(Box::new(inner)))
            }
            TokenKind::Ident => {
                let name = tok.literal.to_lowercase();
                // A call's `(` must follow the name directly
                let next = self.scanner.scan();
                if next.kind == TokenKind::LParen {
                    self.enter(next.span)?;
                    let args = self.parse_call_args()?;
                    self.depth -= 1;
                    Ok(Expr::Call {
                        name: Arc::from(name),
                        args,
                    })
                } else {
                    self.scanner.unscan();
                    Ok(Expr::Call {
                        name: Arc::from(name),
                        args: Vec::new(),
                    })
                }
            }
            TokenKind::BoundParam => Ok(Expr::BoundParam(Arc::from(tok.literal.as_ref()))),
            TokenKind::String => Ok(Literal::String(tok.literal.into_owned()).into()),
            TokenKind::True => Ok(Literal::Bool(true).into()),
            TokenKind::False => Ok(Literal::Bool(false).into()),
            TokenKind::Integer => self.integer_literal(&tok),
            TokenKind::Number => self.number_literal(&tok),
            TokenKind::Duration => self.duration_literal(&tok),
            TokenKind::Regex => Err(ParseError::at_span(
                "regex literals are only allowed as call arguments",
                tok.span,
                self.source,
            )),
            TokenKind::BadString => Err(ParseError::at_span(
                format!("bad string: '{}", tok.literal),
                tok.span,
                self.source,
            )),
            TokenKind::BadEscape => Err(self.bad_escape(&tok)),
            TokenKind::BadRegex => Err(self.bad_regex(&tok)),
            _ => Err(ParseError::at_token(&tok, UNARY_EXPECTED, self.source)),
        }
    }

    /// Parse a call's arguments; the name and `(` have been consumed.
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();

        let tok = self.scan_ignore_whitespace();
        if tok.kind == TokenKind::RParen {
            return Ok(args);
        }
        self.scanner.unscan();

        loop {
            args.push(self.parse_argument()?);

            let tok = self.scan_ignore_whitespace();
            match tok.kind {
                TokenKind::Comma => {}
                TokenKind::RParen => return Ok(args),
                _ => return Err(ParseError::at_token(&tok, &[",", ")"], self.source)),
            }
        }
    }

    /// Parse one call argument, trying a regex literal first.
    fn parse_argument(&mut self) -> ParseResult<Expr> {
        let tok = self.scan_ignore_whitespace();
        match tok.kind {
            TokenKind::Regex => {
                let re = Regex::new(&tok.literal).map_err(|e| {
                    ParseError::at_span(format!("bad regex: {e}"), tok.span, self.source)
                })?;
                Ok(Literal::Regex(re).into())
            }
            TokenKind::BadEscape => Err(self.bad_escape(&tok)),
            TokenKind::BadRegex => Err(self.bad_regex(&tok)),
            _ => {
                self.scanner.unscan();
                self.parse_expression(true)
            }
        }
    }

    fn integer_literal(&self, tok: &Token<'_>) -> ParseResult<Expr> {
        tok.literal
            .parse::<i64>()
            .map(|v| Literal::Integer(v).into())
            .map_err(|_| {
                ParseError::at_span(
                    format!("unable to parse integer: {}", tok.literal),
                    tok.span,
                    self.source,
                )
            })
    }

    fn number_literal(&self, tok: &Token<'_>) -> ParseResult<Expr> {
        tok.literal
            .parse::<f64>()
            .map(|v| Literal::Number(v).into())
            .map_err(|_| {
                ParseError::at_span(
                    format!("unable to parse number: {}", tok.literal),
                    tok.span,
                    self.source,
                )
            })
    }

    fn duration_literal(&self, tok: &Token<'_>) -> ParseResult<Expr> {
        parse_duration(&tok.literal)
            .map(|d| Literal::Duration(d).into())
            .ok_or_else(|| {
                ParseError::at_span(
                    format!("invalid duration: {}", tok.literal),
                    tok.span,
                    self.source,
                )
            })
    }

    fn bad_escape(&self, tok: &Token<'_>) -> ParseError {
        ParseError::at_span(format!("bad escape: {}", tok.literal), tok.span, self.source)
    }

    fn bad_regex(&self, tok: &Token<'_>) -> ParseError {
        ParseError::at_span(format!("bad regex: {}", tok.literal), tok.span, self.source)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        let tok = self.scan_ignore_whitespace();
        if tok.kind == kind {
            Ok(())
        } else {
            Err(ParseError::at_token(&tok, &[kind.name()], self.source))
        }
    }

    fn enter(&mut self, span: Span) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::at_span(
                format!("maximum nesting depth ({MAX_NESTING_DEPTH}) exceeded"),
                span,
                self.source,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    /// Scan the next token that is not whitespace
    fn scan_ignore_whitespace(&mut self) -> Token<'a> {
        loop {
            let tok = self.scanner.scan();
            if tok.kind != TokenKind::Whitespace {
                return tok;
            }
        }
    }
}

/// Parse a duration literal such as `15m`, `10µs` or `2w`.
///
/// Returns `None` for unknown units or values that overflow.
pub fn parse_duration(literal: &str) -> Option<Duration> {
    let split = literal
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(literal.len());
    let (digits, unit) = literal.split_at(split);
    let value: u64 = digits.parse().ok()?;

    let nanos_per_unit: u64 = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" | "u" | "µ" | "μ" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        "d" => 86_400 * 1_000_000_000,
        "w" => 7 * 86_400 * 1_000_000_000,
        _ => return None,
    };

    value.checked_mul(nanos_per_unit).map(Duration::from_nanos)
}
