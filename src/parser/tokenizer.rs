//! Tokenizer for `$filter` and `$orderby` expressions
//!
//! The tokenizer knows nothing about the schema. It splits the raw string
//! into punctuation, symbols, typed literals and plain identifiers; whether
//! an identifier is an operator, a method or a property is decided by the
//! parser.

use super::error::TokenizerError;
use crate::model::LiteralValue;
use crate::model::value::{
    parse_binary, parse_datetime, parse_datetime_offset, parse_guid, parse_time,
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier: property name, operator keyword or method name
    Literal,
    /// Typed literal
    SimpleType,
    /// `/` or `-`
    Symbol,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
}

/// A token with its source text and offset
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'input> {
    /// Classification
    pub kind: TokenKind,
    /// Source text of the token
    pub uri_literal: &'input str,
    /// Value, for `SimpleType` tokens only
    pub value: Option<LiteralValue>,
    /// Byte offset in the expression
    pub position: usize,
}

impl<'input> Token<'input> {
    fn new(kind: TokenKind, uri_literal: &'input str, position: usize) -> Self {
        Self {
            kind,
            uri_literal,
            value: None,
            position,
        }
    }

    fn simple_type(uri_literal: &'input str, value: LiteralValue, position: usize) -> Self {
        Self {
            kind: TokenKind::SimpleType,
            uri_literal,
            value: Some(value),
            position,
        }
    }

    /// Check kind and text at once
    pub fn is(&self, kind: TokenKind, literal: &str) -> bool {
        self.kind == kind && self.uri_literal == literal
    }

    /// Offset just past the token
    pub fn end(&self) -> usize {
        self.position + self.uri_literal.len()
    }
}

/// Fully materialized token sequence with a read cursor
#[derive(Debug, Clone, Default)]
pub struct TokenList<'input> {
    tokens: Vec<Token<'input>>,
    current: usize,
}

impl<'input> TokenList<'input> {
    /// Wrap a token vector
    pub fn new(tokens: Vec<Token<'input>>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Next unconsumed token
    pub fn look(&self) -> Option<&Token<'input>> {
        self.tokens.get(self.current)
    }

    /// Unconsumed token `n` places after the next one
    pub fn look_ahead(&self, n: usize) -> Option<&Token<'input>> {
        self.tokens.get(self.current + n)
    }

    /// Most recently consumed token
    pub fn look_prev(&self) -> Option<&Token<'input>> {
        self.current.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    /// Consume and return the next token
    pub fn next(&mut self) -> Option<&Token<'input>> {
        let token = self.tokens.get(self.current)?;
        self.current += 1;
        Some(token)
    }

    /// Check for unconsumed tokens
    pub fn has_tokens(&self) -> bool {
        self.current < self.tokens.len()
    }

    /// Total number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check for an empty token list
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens, consumed or not
    pub fn tokens(&self) -> &[Token<'input>] {
        &self.tokens
    }
}

/// Typed literal prefixes: `prefix'body'`
const PREFIXES: [&str; 6] = ["X", "binary", "datetime", "datetimeoffset", "time", "guid"];

/// Byte-level scanner
#[derive(Debug, Clone)]
pub struct Tokenizer<'input> {
    input: &'input str,
    bytes: &'input [u8],
    pos: usize,
    end: usize,
}

impl<'input> Tokenizer<'input> {
    /// Create a tokenizer over a URI-decoded expression
    pub fn new(input: &'input str) -> Self {
        let bytes = input.as_bytes();
        Self {
            input,
            bytes,
            pos: 0,
            end: bytes.len(),
        }
    }

    #[inline(always)]
    fn is_id_start(ch: u8) -> bool {
        matches!(ch, b'A'..=b'Z' | b'a'..=b'z' | b'_')
    }

    #[inline(always)]
    fn is_id_continue(ch: u8) -> bool {
        matches!(ch, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_')
    }

    #[inline]
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.end && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.pos < self.end && self.bytes[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        self.pos - start
    }

    fn malformed(&self, start: usize) -> TokenizerError {
        TokenizerError::MalformedLiteral {
            literal: self.input[start..self.pos].to_string(),
            position: start,
        }
    }

    /// Scan a quoted body starting at the opening quote; returns the
    /// unescaped content
    fn scan_quoted(&mut self) -> Result<String, TokenizerError> {
        let quote = self.pos;
        self.pos += 1;
        let mut content = String::new();
        let mut chunk_start = self.pos;

        while self.pos < self.end {
            if self.bytes[self.pos] == b'\'' {
                content.push_str(&self.input[chunk_start..self.pos]);
                if self.peek_byte(1) == Some(b'\'') {
                    content.push('\'');
                    self.pos += 2;
                    chunk_start = self.pos;
                    continue;
                }
                self.pos += 1;
                return Ok(content);
            }
            self.pos += 1;
        }

        Err(TokenizerError::UnterminatedStringLiteral { position: quote })
    }

    fn scan_number(&mut self) -> Result<Token<'input>, TokenizerError> {
        let start = self.pos;
        if self.bytes[self.pos] == b'-' {
            self.pos += 1;
        }
        self.skip_digits();

        let mut has_fraction = false;
        if self.peek_byte(0) == Some(b'.') && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
            self.skip_digits();
            has_fraction = true;
        }

        let mut has_exponent = false;
        if matches!(self.peek_byte(0), Some(b'e' | b'E')) {
            let sign = usize::from(matches!(self.peek_byte(1), Some(b'+' | b'-')));
            if self.peek_byte(1 + sign).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1 + sign;
                self.skip_digits();
                has_exponent = true;
            }
        }

        let number_end = self.pos;
        let suffix = match self.peek_byte(0) {
            Some(ch @ (b'L' | b'l' | b'M' | b'm' | b'D' | b'd' | b'F' | b'f'))
                if !self.peek_byte(1).is_some_and(Self::is_id_continue) =>
            {
                self.pos += 1;
                Some(ch.to_ascii_uppercase())
            }
            _ => None,
        };

        if self.peek_byte(0).is_some_and(Self::is_id_continue) {
            while self.pos < self.end && Self::is_id_continue(self.bytes[self.pos]) {
                self.pos += 1;
            }
            return Err(self.malformed(start));
        }

        let text = &self.input[start..number_end];
        let value = match suffix {
            Some(b'L') if !has_fraction && !has_exponent => text.parse().ok().map(LiteralValue::Int64),
            Some(b'L') => None,
            Some(b'M') => parse_decimal(text, has_exponent).map(LiteralValue::Decimal),
            Some(b'D') => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(LiteralValue::Double),
            Some(b'F') => text
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(LiteralValue::Single),
            _ if has_exponent => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(LiteralValue::Double),
            _ if has_fraction => parse_decimal(text, false).map(LiteralValue::Decimal),
            _ => text
                .parse::<i32>()
                .map(LiteralValue::Int32)
                .or_else(|_| text.parse::<i64>().map(LiteralValue::Int64))
                .ok(),
        };

        match value {
            Some(value) => Ok(Token::simple_type(&self.input[start..self.pos], value, start)),
            None => Err(self.malformed(start)),
        }
    }

    fn scan_identifier(&mut self) -> Result<Token<'input>, TokenizerError> {
        let start = self.pos;
        while self.pos < self.end && Self::is_id_continue(self.bytes[self.pos]) {
            self.pos += 1;
        }
        let name = &self.input[start..self.pos];

        if self.peek_byte(0) == Some(b'\'') {
            if let Some(prefix) = PREFIXES.iter().find(|p| p.eq_ignore_ascii_case(name)) {
                return self.scan_prefixed(prefix, start);
            }
        }

        let token = match name {
            "true" => Token::simple_type(name, LiteralValue::Boolean(true), start),
            "false" => Token::simple_type(name, LiteralValue::Boolean(false), start),
            "null" => Token::simple_type(name, LiteralValue::Null, start),
            _ => Token::new(TokenKind::Literal, name, start),
        };
        Ok(token)
    }

    fn scan_prefixed(&mut self, prefix: &str, start: usize) -> Result<Token<'input>, TokenizerError> {
        let body = self.scan_quoted()?;
        let value = match prefix {
            "X" | "binary" => parse_binary(&body).map(LiteralValue::Binary),
            "datetime" => parse_datetime(&body).map(LiteralValue::DateTime),
            "datetimeoffset" => parse_datetime_offset(&body).map(LiteralValue::DateTimeOffset),
            "time" => parse_time(&body).map(LiteralValue::Time),
            "guid" => parse_guid(&body).map(LiteralValue::Guid),
            _ => None,
        };

        match value {
            Some(value) => Ok(Token::simple_type(&self.input[start..self.pos], value, start)),
            None => Err(self.malformed(start)),
        }
    }

    /// Scan the next token
    pub fn next_token(&mut self) -> Result<Option<Token<'input>>, TokenizerError> {
        self.skip_whitespace();

        if self.pos >= self.end {
            return Ok(None);
        }

        let start = self.pos;
        let input = self.input;
        let single = |kind| Token::new(kind, &input[start..start + 1], start);

        let token = match self.bytes[self.pos] {
            b'(' => {
                self.pos += 1;
                single(TokenKind::OpenParen)
            }
            b')' => {
                self.pos += 1;
                single(TokenKind::CloseParen)
            }
            b',' => {
                self.pos += 1;
                single(TokenKind::Comma)
            }
            b'/' => {
                self.pos += 1;
                single(TokenKind::Symbol)
            }
            b'-' if self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()) => self.scan_number()?,
            b'-' => {
                self.pos += 1;
                single(TokenKind::Symbol)
            }
            b'\'' => {
                let value = self.scan_quoted()?;
                Token::simple_type(&self.input[start..self.pos], LiteralValue::String(value), start)
            }
            b'0'..=b'9' => self.scan_number()?,
            ch if Self::is_id_start(ch) => self.scan_identifier()?,
            _ => {
                let character = self.input[start..].chars().next().unwrap_or('\u{FFFD}');
                return Err(TokenizerError::UnknownCharacter {
                    character,
                    position: start,
                });
            }
        };

        Ok(Some(token))
    }

    /// Scan the whole input
    pub fn tokenize_all(mut self) -> Result<TokenList<'input>, TokenizerError> {
        let mut tokens = Vec::with_capacity(16);
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(TokenList::new(tokens))
    }
}

fn parse_decimal(text: &str, has_exponent: bool) -> Option<Decimal> {
    if has_exponent {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    }
}

/// Tokenize an expression string
pub fn tokenize(input: &str) -> Result<TokenList<'_>, TokenizerError> {
    Tokenizer::new(input).tokenize_all()
}
