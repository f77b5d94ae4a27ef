//! Recursive-descent text format parser.
//!
//! The parser reads field names and hands each one to
//! [`Message::merge_text_field`]. Generated code answers by calling the
//! typed `read_*` method for the field, which consumes the value. Numeric
//! names such as `1: 5` are first mapped through
//! [`Message::text_field_name`].
//!
//! Nesting is counted explicitly: every `{ ... }` or `< ... >` block entered,
//! whether it belongs to a known field or to an unknown one being skipped,
//! increments a depth that must stay within
//! [`TextDecodeOptions::message_depth_limit`].

use super::scanner::{FieldName, TextScanner};
use super::TextDecodeOptions;
use crate::any::AnyMessage;
use crate::error::{Error, Result};
use crate::message::Message;
use tracing::trace;

/// Text format parser handed to [`Message::merge_text_field`]
#[derive(Debug)]
pub struct TextParser<'a> {
    scanner: TextScanner<'a>,
    options: &'a TextDecodeOptions,
    depth: usize,
    saw_colon: bool,
}

impl<'a> TextParser<'a> {
    /// Creates a parser over `input`
    pub fn new(input: &'a str, options: &'a TextDecodeOptions) -> Self {
        Self {
            scanner: TextScanner::new(input),
            options,
            depth: 0,
            saw_colon: false,
        }
    }

    /// Parses the whole input into `message`
    pub fn parse_into(&mut self, message: &mut dyn Message) -> Result<()> {
        self.merge_fields(message, None)
    }

    /// Current block nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.message_depth_limit {
            return Err(Error::MessageDepthLimit {
                limit: self.options.message_depth_limit,
            });
        }
        Ok(())
    }

    /// Consumes `{` or `<` and returns the matching closing byte
    fn open_block(&mut self) -> Result<u8> {
        if self.scanner.try_consume(b'{') {
            Ok(b'}')
        } else if self.scanner.try_consume(b'<') {
            Ok(b'>')
        } else {
            Err(self.scanner.error("expected '{' or '<'"))
        }
    }

    fn skip_separator(&mut self) {
        if !self.scanner.try_consume(b',') {
            self.scanner.try_consume(b';');
        }
    }

    fn merge_fields(&mut self, message: &mut dyn Message, close: Option<u8>) -> Result<()> {
        loop {
            match close {
                Some(c) if self.scanner.try_consume(c) => return Ok(()),
                Some(c) if self.scanner.at_end() => {
                    return Err(self.scanner.error(format!("expected '{}'", c as char)));
                }
                None if self.scanner.at_end() => return Ok(()),
                _ => {}
            }

            let line = self.scanner.line();
            let name = self.scanner.read_field_name()?;
            self.saw_colon = self.scanner.try_consume(b':');

            let handled = match name {
                FieldName::Ident(field) => message.merge_text_field(field, self)?,
                FieldName::Number(number) => match message.text_field_name(number) {
                    Some(field) => message.merge_text_field(field, self)?,
                    None => false,
                },
                FieldName::Bracketed(url) if url.contains('/') => {
                    match message.as_any_mut().downcast_mut::<AnyMessage>() {
                        Some(any) => {
                            self.merge_expanded_any(any, url)?;
                            true
                        }
                        None => false,
                    }
                }
                // Extensions are offered to the message under their bracketed name.
                FieldName::Bracketed(extension) => {
                    message.merge_text_field(&format!("[{}]", extension), self)?
                }
            };

            if !handled {
                let ignore = match name {
                    FieldName::Bracketed(_) => self.options.ignore_unknown_extension_fields,
                    _ => self.options.ignore_unknown_fields,
                };
                if !ignore {
                    return Err(Error::unknown_field(name.to_string(), line));
                }
                self.skip_value(self.saw_colon)?;
            }

            self.skip_separator();
        }
    }

    fn merge_expanded_any(&mut self, any: &mut AnyMessage, url: &str) -> Result<()> {
        let options = self.options;
        let info = options
            .registry
            .as_ref()
            .and_then(|registry| registry.lookup(url))
            .ok_or_else(|| Error::any_not_registered(url))?;
        let mut payload = info.new_instance();
        self.read_message(payload.message_mut())?;
        trace!(type_url = url, "parsed expanded Any");
        any.set_message(url.to_string(), payload);
        Ok(())
    }

    fn skip_value(&mut self, colon: bool) -> Result<()> {
        match self.scanner.peek() {
            Some(b'{' | b'<') => self.skip_message(),
            Some(b'[') if colon => self.skip_list(),
            _ if colon => self.skip_scalar(),
            _ => Err(self.scanner.error("expected ':' or '{'")),
        }
    }

    fn skip_message(&mut self) -> Result<()> {
        let close = self.open_block()?;
        self.enter()?;
        while !self.scanner.try_consume(close) {
            self.scanner.read_field_name()?;
            let colon = self.scanner.try_consume(b':');
            self.skip_value(colon)?;
            self.skip_separator();
        }
        self.depth -= 1;
        Ok(())
    }

    fn skip_list(&mut self) -> Result<()> {
        self.scanner.expect(b'[')?;
        if self.scanner.try_consume(b']') {
            return Ok(());
        }
        loop {
            match self.scanner.peek() {
                Some(b'{' | b'<') => self.skip_message()?,
                _ => self.skip_scalar()?,
            }
            if self.scanner.try_consume(b']') {
                return Ok(());
            }
            self.scanner.expect(b',')?;
        }
    }

    fn skip_scalar(&mut self) -> Result<()> {
        if self.scanner.at_string() {
            self.scanner.read_string_literal()?;
        } else {
            self.scanner.read_number_token()?;
        }
        Ok(())
    }

    fn require_colon(&mut self) -> Result<()> {
        if self.saw_colon {
            Ok(())
        } else {
            Err(self.scanner.error("expected ':'"))
        }
    }

    /// Reads an integer literal as (negative, magnitude)
    fn parse_integer(&mut self) -> Result<(bool, u64)> {
        let token = self.scanner.read_number_token()?;
        let (negative, body) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else if body.len() > 1 && body.starts_with('0') {
            u64::from_str_radix(&body[1..], 8)
        } else {
            body.parse()
        };
        magnitude
            .map(|m| (negative, m))
            .map_err(|_| self.scanner.error(format!("invalid integer '{}'", token)))
    }

    fn read_signed(&mut self, min: i64, max: i64) -> Result<i64> {
        self.require_colon()?;
        let (negative, magnitude) = self.parse_integer()?;
        let value = if negative {
            -(magnitude as i128)
        } else {
            magnitude as i128
        };
        if value < min as i128 || value > max as i128 {
            return Err(self.scanner.error(format!("integer {} out of range", value)));
        }
        Ok(value as i64)
    }

    fn read_unsigned(&mut self, max: u64) -> Result<u64> {
        self.require_colon()?;
        let (negative, magnitude) = self.parse_integer()?;
        if (negative && magnitude != 0) || magnitude > max {
            return Err(self.scanner.error("unsigned integer out of range"));
        }
        Ok(magnitude)
    }

    /// Reads an `int32` (also `sint32` and `sfixed32`) value
    pub fn read_int32(&mut self) -> Result<i32> {
        Ok(self.read_signed(i32::MIN as i64, i32::MAX as i64)? as i32)
    }

    /// Reads an `int64` (also `sint64` and `sfixed64`) value
    pub fn read_int64(&mut self) -> Result<i64> {
        self.read_signed(i64::MIN, i64::MAX)
    }

    /// Reads a `uint32` (also `fixed32`) value
    pub fn read_uint32(&mut self) -> Result<u32> {
        Ok(self.read_unsigned(u32::MAX as u64)? as u32)
    }

    /// Reads a `uint64` (also `fixed64`) value
    pub fn read_uint64(&mut self) -> Result<u64> {
        self.read_unsigned(u64::MAX)
    }

    /// Reads a `double` value, accepting integers, `inf` and `nan`
    pub fn read_double(&mut self) -> Result<f64> {
        self.require_colon()?;
        let token = self.scanner.read_number_token()?;
        let (negative, body) = match token.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, token),
        };
        let parsed = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16).map(|v| v as f64).ok()
        } else {
            let lower = body.to_ascii_lowercase();
            let trimmed = match lower.as_str() {
                "inf" | "infinity" | "nan" => lower.as_str(),
                other => other.strip_suffix('f').unwrap_or(other),
            };
            trimmed.parse::<f64>().ok()
        };
        let value =
            parsed.ok_or_else(|| self.scanner.error(format!("invalid number '{}'", token)))?;
        Ok(if negative { -value } else { value })
    }

    /// Reads a `float` value
    pub fn read_float(&mut self) -> Result<f32> {
        Ok(self.read_double()? as f32)
    }

    /// Reads a `bool` value (`true`, `false`, `t`, `f`, `1` or `0`)
    pub fn read_bool(&mut self) -> Result<bool> {
        self.require_colon()?;
        let token = self.scanner.read_number_token()?;
        match token {
            "true" | "True" | "t" | "1" => Ok(true),
            "false" | "False" | "f" | "0" => Ok(false),
            other => Err(self.scanner.error(format!("invalid bool '{}'", other))),
        }
    }

    /// Reads a `string` value
    pub fn read_string(&mut self) -> Result<String> {
        self.require_colon()?;
        let bytes = self.scanner.read_string_literal()?;
        String::from_utf8(bytes).map_err(|_| self.scanner.error("string is not valid UTF-8"))
    }

    /// Reads a `bytes` value
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        self.require_colon()?;
        self.scanner.read_string_literal()
    }

    /// Reads an enum by symbolic name (through `resolve`) or by number
    pub fn read_enum(&mut self, resolve: impl Fn(&str) -> Option<i32>) -> Result<i32> {
        self.require_colon()?;
        match self.scanner.read_identifier() {
            Some(name) => {
                resolve(name).ok_or_else(|| self.scanner.error(format!("unknown enum value '{}'", name)))
            }
            None => {
                let (negative, magnitude) = self.parse_integer()?;
                let value = if negative {
                    -(magnitude as i128)
                } else {
                    magnitude as i128
                };
                i32::try_from(value).map_err(|_| self.scanner.error("enum value out of range"))
            }
        }
    }

    /// Reads a `{ ... }` or `< ... >` block into `message`
    pub fn read_message(&mut self, message: &mut dyn Message) -> Result<()> {
        let close = self.open_block()?;
        self.enter()?;
        self.merge_fields(message, Some(close))?;
        self.depth -= 1;
        Ok(())
    }

    /// Reads a group; groups share the message syntax
    pub fn read_group(&mut self, message: &mut dyn Message) -> Result<()> {
        self.read_message(message)
    }

    /// Reads one `{ key: ... value: ... }` map entry.
    ///
    /// Missing keys or values take their default.
    pub fn read_map_entry<K, V>(
        &mut self,
        mut read_key: impl FnMut(&mut Self) -> Result<K>,
        mut read_value: impl FnMut(&mut Self) -> Result<V>,
    ) -> Result<(K, V)>
    where
        K: Default,
        V: Default,
    {
        let close = self.open_block()?;
        self.enter()?;
        let mut key = K::default();
        let mut value = V::default();
        while !self.scanner.try_consume(close) {
            let line = self.scanner.line();
            let name = self.scanner.read_field_name()?;
            self.saw_colon = self.scanner.try_consume(b':');
            match name {
                FieldName::Ident("key") => key = read_key(self)?,
                FieldName::Ident("value") => value = read_value(self)?,
                other => return Err(Error::unknown_field(other.to_string(), line)),
            }
            self.skip_separator();
        }
        self.depth -= 1;
        Ok((key, value))
    }

    /// Reads a repeated field written either as one value or as a `[a, b, ...]` list
    pub fn read_repeated<T>(
        &mut self,
        out: &mut Vec<T>,
        mut read: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<()> {
        if !self.scanner.try_consume(b'[') {
            out.push(read(self)?);
            return Ok(());
        }
        if self.scanner.try_consume(b']') {
            return Ok(());
        }
        loop {
            out.push(read(self)?);
            if self.scanner.try_consume(b']') {
                return Ok(());
            }
            self.scanner.expect(b',')?;
        }
    }
}
