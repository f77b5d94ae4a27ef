//! Tokenizer for text format input.
//!
//! The scanner works on bytes and hands out slices of the input. Whitespace
//! and `#` comments are skipped before every token; line and column are
//! tracked for error messages.

use crate::error::{Error, Result};
use crate::wire::MAX_FIELD_NUMBER;

/// How a field is named in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldName<'a> {
    /// `name`
    Ident(&'a str),
    /// `123`
    Number(u32),
    /// `[some.extension]` or `[type.googleapis.com/pkg.Type]`
    Bracketed(&'a str),
}

impl std::fmt::Display for FieldName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldName::Ident(name) => f.write_str(name),
            FieldName::Number(number) => write!(f, "{}", number),
            FieldName::Bracketed(name) => write!(f, "[{}]", name),
        }
    }
}

#[derive(Debug)]
pub(crate) struct TextScanner<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> TextScanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes().get(pos).copied()
    }

    /// 1-based line of the next token
    pub(crate) fn line(&mut self) -> usize {
        self.skip_whitespace();
        self.line
    }

    /// Error located at the current position
    pub(crate) fn error(&self, details: impl Into<String>) -> Error {
        Error::malformed_text(self.line, self.pos - self.line_start + 1, details)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.byte_at(self.pos) {
            match b {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                b' ' | b'\t' | b'\r' | 0x0B | 0x0C => self.pos += 1,
                b'#' => {
                    while let Some(c) = self.byte_at(self.pos) {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    /// Next significant byte, without consuming it
    pub(crate) fn peek(&mut self) -> Option<u8> {
        self.skip_whitespace();
        self.byte_at(self.pos)
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    pub(crate) fn try_consume(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, expected: u8) -> Result<()> {
        if self.try_consume(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", expected as char)))
        }
    }

    pub(crate) fn read_identifier(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        if !self.byte_at(start).is_some_and(is_ident_start) {
            return None;
        }
        while self.byte_at(self.pos).is_some_and(is_ident_char) {
            self.pos += 1;
        }
        Some(&self.src[start..self.pos])
    }

    /// Reads a field name: identifier, field number or bracketed name.
    ///
    /// Field numbers outside `1..=MAX_FIELD_NUMBER` are rejected here, so they
    /// fail even when unknown fields are being ignored.
    pub(crate) fn read_field_name(&mut self) -> Result<FieldName<'a>> {
        match self.peek() {
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                let mut value: u64 = 0;
                while let Some(d) = self.byte_at(self.pos).filter(u8::is_ascii_digit) {
                    value = value.saturating_mul(10).saturating_add((d - b'0') as u64);
                    self.pos += 1;
                }
                if self.byte_at(self.pos).is_some_and(is_ident_char) {
                    return Err(self.error("invalid field number"));
                }
                if value == 0 || value > MAX_FIELD_NUMBER as u64 {
                    return Err(self.error(format!(
                        "field number {} out of range",
                        &self.src[start..self.pos]
                    )));
                }
                Ok(FieldName::Number(value as u32))
            }
            Some(b'[') => {
                self.pos += 1;
                self.skip_whitespace();
                let start = self.pos;
                while self
                    .byte_at(self.pos)
                    .is_some_and(|b| is_ident_char(b) || b == b'.' || b == b'/')
                {
                    self.pos += 1;
                }
                let name = &self.src[start..self.pos];
                if name.is_empty() {
                    return Err(self.error("empty bracketed field name"));
                }
                self.expect(b']')?;
                Ok(FieldName::Bracketed(name))
            }
            _ => self
                .read_identifier()
                .map(FieldName::Ident)
                .ok_or_else(|| self.error("expected field name")),
        }
    }

    /// Reads a numeric token (with optional leading `-`) as written
    pub(crate) fn read_number_token(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        if self.byte_at(self.pos) == Some(b'-') {
            self.pos += 1;
        }
        let body = self.pos;
        let hex = matches!(
            (self.byte_at(body), self.byte_at(body + 1)),
            (Some(b'0'), Some(b'x' | b'X'))
        );
        while let Some(b) = self.byte_at(self.pos) {
            let exponent_sign = (b == b'+' || b == b'-')
                && !hex
                && self.pos > body
                && matches!(self.byte_at(self.pos - 1), Some(b'e' | b'E'));
            if is_ident_char(b) || b == b'.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == body {
            return Err(self.error("expected a number"));
        }
        Ok(&self.src[start..self.pos])
    }

    pub(crate) fn at_string(&mut self) -> bool {
        matches!(self.peek(), Some(b'"' | b'\''))
    }

    /// Reads one or more adjacent quoted strings and concatenates them
    pub(crate) fn read_string_literal(&mut self) -> Result<Vec<u8>> {
        if !self.at_string() {
            return Err(self.error("expected a quoted string"));
        }
        let mut out = Vec::new();
        while self.at_string() {
            self.read_one_string(&mut out)?;
        }
        Ok(out)
    }

    fn read_one_string(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let Some(quote) = self.byte_at(self.pos) else {
            return Err(self.error("expected a quoted string"));
        };
        self.pos += 1;
        loop {
            let Some(b) = self.byte_at(self.pos) else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            match b {
                b'\n' => return Err(self.error("newline in string")),
                b'\\' => self.read_escape(out)?,
                _ if b == quote => return Ok(()),
                _ => out.push(b),
            }
        }
    }

    fn take_digits(&mut self, max: usize, radix: u32) -> u32 {
        let mut value = 0;
        let mut taken = 0;
        while taken < max {
            let Some(digit) = self.byte_at(self.pos).and_then(|b| (b as char).to_digit(radix)) else {
                break;
            };
            value = value * radix + digit;
            self.pos += 1;
            taken += 1;
        }
        value
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let Some(b) = self.byte_at(self.pos) else {
            return Err(self.error("unterminated string"));
        };
        self.pos += 1;
        match b {
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0B),
            b'\\' | b'\'' | b'"' | b'?' => out.push(b),
            b'0'..=b'7' => {
                self.pos -= 1;
                let value = self.take_digits(3, 8);
                if value > 0xFF {
                    return Err(self.error("octal escape out of range"));
                }
                out.push(value as u8);
            }
            b'x' | b'X' => {
                let start = self.pos;
                let value = self.take_digits(2, 16);
                if self.pos == start {
                    return Err(self.error("expected hex digits after \\x"));
                }
                out.push(value as u8);
            }
            b'u' | b'U' => {
                let width = if b == b'u' { 4 } else { 8 };
                let start = self.pos;
                let value = self.take_digits(width, 16);
                let c = (self.pos - start == width)
                    .then(|| char::from_u32(value))
                    .flatten()
                    .ok_or_else(|| self.error("invalid unicode escape"))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            other => {
                return Err(self.error(format!("unknown escape '\\{}'", other as char)));
            }
        }
        Ok(())
    }
}
