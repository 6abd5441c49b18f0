//! Scanner for tokenizing rule strings
//!
//! The scanner never fails: malformed input surfaces as `Illegal`,
//! `BadString`, `BadEscape` or `BadRegex` tokens and the parser turns those
//! into [`ParseError`](crate::ParseError)s with a position.

use crate::span::Span;
use crate::token::{Token, TokenKind, lookup};
use std::borrow::Cow;

/// Scanner over a rule string with one token of push-back.
pub struct Scanner<'a> {
    input: &'a str,
    position: usize,
    /// Last token handed out, kept so it can be pushed back
    last: Option<Token<'a>>,
    /// Token pushed back by [`Scanner::unscan`]
    pending: Option<Token<'a>>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner from an input string
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            last: None,
            pending: None,
        }
    }

    /// The source being scanned
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Scan every token up to and including `Eof`, dropping whitespace.
    pub fn tokenize(&mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::with_capacity((self.input.len() / 4).max(4));
        loop {
            let token = self.scan();
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Eof => {
                    tokens.push(token);
                    break;
                }
                _ => tokens.push(token),
            }
        }
        tokens
    }

    /// Return the next token, honouring a pushed-back one first.
    pub fn scan(&mut self) -> Token<'a> {
        let token = match self.pending.take() {
            Some(token) => token,
            None => self.next_token(),
        };
        self.last = Some(token.clone());
        token
    }

    /// Push the previously scanned token back.
    ///
    /// Only one token of push-back is supported; a second call before the
    /// next [`Scanner::scan`] is a no-op.
    pub fn unscan(&mut self) {
        if self.pending.is_none() {
            self.pending = self.last.take();
        }
    }

    fn next_token(&mut self) -> Token<'a> {
        let start = self.position;

        let Some(ch) = self.current_char() else {
            return Token::new(TokenKind::Eof, Span::at(start));
        };

        match ch {
            c if c.is_whitespace() => self.read_whitespace(),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier_or_keyword(),
            c if c.is_ascii_digit() => self.read_number(),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            '\'' => self.read_string(),
            '/' => self.read_regex(),
            '$' => self.read_bound_param(),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            '|' => self.single(TokenKind::Or),
            '!' => self.single(TokenKind::Not),
            '&' if self.peek() == Some('&') => {
                self.advance();
                self.advance();
                Token::new(TokenKind::And, Span::new(start, self.position))
            }
            _ => {
                self.advance();
                Token::with_literal(
                    TokenKind::Illegal,
                    Span::new(start, self.position),
                    &self.input[start..self.position],
                )
            }
        }
    }

    /// Get the current character at position
    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        let current = self.current_char()?;
        self.input[self.position + current.len_utf8()..].chars().next()
    }

    /// Advance position by the current character's UTF-8 byte length
    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.position;
        self.advance();
        Token::new(kind, Span::new(start, self.position))
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.current_char().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Read a whitespace run; `\r\n` and lone `\r` become `\n`.
    fn read_whitespace(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance_while(char::is_whitespace);
        let raw = &self.input[start..self.position];
        let span = Span::new(start, self.position);

        if !raw.contains('\r') {
            return Token::with_literal(TokenKind::Whitespace, span, raw);
        }
        let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
        Token::with_literal(TokenKind::Whitespace, span, normalized)
    }

    fn read_identifier_or_keyword(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let name = &self.input[start..self.position];
        let span = Span::new(start, self.position);

        match lookup(name) {
            TokenKind::Ident => Token::with_literal(TokenKind::Ident, span, name),
            keyword => Token::new(keyword, span),
        }
    }

    /// Read an integer, decimal or duration literal.
    ///
    /// Only integers take a unit suffix: `10.3s` scans as the number `10.3`
    /// followed by the identifier `s`. Any alphabetic suffix is accepted here
    /// (`10x`); the parser rejects units it does not know.
    fn read_number(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance_while(|c| c.is_ascii_digit());

        let mut is_decimal = false;
        if self.current_char() == Some('.') && self.peek().is_some_and(|c| c.is_ascii_digit()) {
            is_decimal = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        let kind = if is_decimal {
            TokenKind::Number
        } else if self.current_char().is_some_and(char::is_alphabetic) {
            self.advance_while(char::is_alphabetic);
            TokenKind::Duration
        } else {
            TokenKind::Integer
        };

        Token::with_literal(
            kind,
            Span::new(start, self.position),
            &self.input[start..self.position],
        )
    }

    /// Read a single-quoted string literal
    fn read_string(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance(); // opening quote
        let body_start = self.position;
        let mut decoded: Option<String> = None;

        loop {
            let Some(ch) = self.current_char() else {
                return self.bad_string(start, body_start, decoded);
            };

            match ch {
                '\'' => {
                    let body_end = self.position;
                    self.advance();
                    let span = Span::new(start, self.position);
                    return match decoded {
                        Some(s) => Token::with_literal(TokenKind::String, span, s),
                        None => Token::with_literal(
                            TokenKind::String,
                            span,
                            &self.input[body_start..body_end],
                        ),
                    };
                }
                '\n' => return self.bad_string(start, body_start, decoded),
                '\\' => {
                    let buf = decoded
                        .get_or_insert_with(|| self.input[body_start..self.position].to_string());
                    self.advance();
                    let escaped = match self.current_char() {
                        Some('n') => '\n',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some(other) => {
                            let esc_start = self.position - 1;
                            self.advance();
                            return Token::with_literal(
                                TokenKind::BadEscape,
                                Span::new(esc_start, self.position),
                                format!("\\{other}"),
                            );
                        }
                        None => return self.bad_string(start, body_start, decoded),
                    };
                    buf.push(escaped);
                    self.advance();
                }
                _ => {
                    if let Some(buf) = decoded.as_mut() {
                        buf.push(ch);
                    }
                    self.advance();
                }
            }
        }
    }

    fn bad_string(&self, start: usize, body_start: usize, decoded: Option<String>) -> Token<'a> {
        let span = Span::new(start, self.position);
        match decoded {
            Some(s) => Token::with_literal(TokenKind::BadString, span, s),
            None => Token::with_literal(
                TokenKind::BadString,
                span,
                &self.input[body_start..self.position],
            ),
        }
    }

    /// Read a `/pattern/` literal.
    ///
    /// `\/` unescapes to `/`; every other escape is kept verbatim for the
    /// regex engine. A trailing backslash is a bad escape and a missing
    /// closing slash is a bad regex.
    fn read_regex(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance(); // opening slash
        let mut pattern = String::new();

        loop {
            match self.current_char() {
                None => {
                    return Token::with_literal(
                        TokenKind::BadRegex,
                        Span::new(start, self.position),
                        pattern,
                    );
                }
                Some('/') => {
                    self.advance();
                    return Token::with_literal(
                        TokenKind::Regex,
                        Span::new(start, self.position),
                        pattern,
                    );
                }
                Some('\\') => {
                    let esc_start = self.position;
                    self.advance();
                    match self.current_char() {
                        Some('/') => pattern.push('/'),
                        Some(other) => {
                            pattern.push('\\');
                            pattern.push(other);
                        }
                        None => {
                            return Token::with_literal(
                                TokenKind::BadEscape,
                                Span::new(esc_start, self.position),
                                "\\",
                            );
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    pattern.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Read `$path` or `$.path`, where path is a dotted identifier chain.
    fn read_bound_param(&mut self) -> Token<'a> {
        let start = self.position;
        self.advance(); // $
        if self.current_char() == Some('.') {
            self.advance();
        }

        let path_start = self.position;
        if !self.current_char().is_some_and(is_ident_start) {
            return Token::with_literal(
                TokenKind::Illegal,
                Span::new(start, self.position),
                &self.input[start..self.position],
            );
        }

        loop {
            self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
            if self.current_char() == Some('.') && self.peek().is_some_and(is_ident_start) {
                self.advance();
            } else {
                break;
            }
        }

        Token::with_literal(
            TokenKind::BoundParam,
            Span::new(start, self.position),
            Cow::Borrowed(&self.input[path_start..self.position]),
        )
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}
