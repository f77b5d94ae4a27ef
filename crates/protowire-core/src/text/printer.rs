//! Text format output.
//!
//! The printer is a [`FieldVisitor`]: known fields arrive through
//! [`Message::traverse`], unknown fields as raw bytes that are walked here.
//!
//! Unknown groups are walked with an explicit stack, so arbitrarily deep
//! group nesting prints without recursion. Unknown length-delimited fields
//! are shown as nested messages only while the nesting budget lasts and
//! only if their payload is structurally a message; otherwise they print
//! as quoted bytes.
//!
//! `Any` payloads are expanded only while the output stays within
//! [`TextEncodeOptions::any_expansion_depth`] blocks. Deeper ones print their
//! raw `type_url` and `value` fields, so nested `Any` chains cannot recurse
//! without bound.

use super::TextEncodeOptions;
use crate::any::AnyMessage;
use crate::binary::DecodeOptions;
use crate::error::Result;
use crate::message::{FieldValue, FieldVisitor, Message};
use crate::unknown::UnknownFieldSet;
use crate::wire::{WireReader, WireType};

/// Renders messages as text format
#[derive(Debug)]
pub struct TextPrinter<'o> {
    options: &'o TextEncodeOptions,
    out: String,
    /// Open `{ ... }` blocks, which is also the nesting depth of the output
    indent: usize,
}

impl<'o> TextPrinter<'o> {
    /// Creates a printer
    pub fn new(options: &'o TextEncodeOptions) -> Self {
        Self {
            options,
            out: String::new(),
            indent: 0,
        }
    }

    /// Prints `message` and returns the text
    pub fn print(mut self, message: &dyn Message) -> Result<String> {
        self.print_body(message)?;
        Ok(self.out)
    }

    fn print_body(&mut self, message: &dyn Message) -> Result<()> {
        let options = self.options;
        let expand = self.indent < options.any_expansion_depth;
        if let Some(any) = message.as_any().downcast_ref::<AnyMessage>().filter(|_| expand) {
            if let Some(payload) = any.expanded(options.registry.as_ref()) {
                self.open_block(&format!("[{}]", any.type_url()));
                self.print_body(payload.message())?;
                self.close_block();
                return self.visit_unknown(any.unknown_fields());
            }
        }
        message.traverse(self)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn open_block(&mut self, label: &str) {
        self.write_indent();
        self.out.push_str(label);
        self.out.push_str(" {\n");
        self.indent += 1;
    }

    fn close_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.write_indent();
        self.out.push_str("}\n");
    }

    fn scalar_line(&mut self, label: &str, value: &str) {
        self.write_indent();
        self.out.push_str(label);
        self.out.push_str(": ");
        self.out.push_str(value);
        self.out.push('\n');
    }

    fn print_value(&mut self, label: &str, value: &FieldValue<'_>) -> Result<()> {
        match value {
            FieldValue::Message(m) | FieldValue::Group(m) => {
                self.open_block(label);
                self.print_body(*m)?;
                self.close_block();
            }
            scalar => {
                let text = format_scalar(scalar);
                self.scalar_line(label, &text);
            }
        }
        Ok(())
    }

    fn print_unknown_bytes(&mut self, data: &[u8], budget: usize) {
        let mut reader = WireReader::new(data);
        let mut open_groups: Vec<u32> = Vec::new();

        // Stops quietly at the first byte that does not parse.
        while let Ok(Some(tag)) = reader.next_tag() {
            let number = tag.field_number().to_string();
            match tag.wire_type() {
                WireType::Varint => {
                    let Ok(value) = reader.read_uint64(tag) else { break };
                    self.scalar_line(&number, &value.to_string());
                }
                WireType::Fixed32 => {
                    let Ok(value) = reader.read_fixed32(tag) else { break };
                    self.scalar_line(&number, &format!("0x{:08x}", value));
                }
                WireType::Fixed64 => {
                    let Ok(value) = reader.read_fixed64(tag) else { break };
                    self.scalar_line(&number, &format!("0x{:016x}", value));
                }
                WireType::LengthDelimited => {
                    let Ok(payload) = reader.read_bytes_ref(tag) else { break };
                    if budget > 0 && !payload.is_empty() && looks_like_message(payload) {
                        self.open_block(&number);
                        self.print_unknown_bytes(payload, budget - 1);
                        self.close_block();
                    } else {
                        let mut quoted = String::with_capacity(payload.len() + 2);
                        quoted.push('"');
                        escape_bytes(payload, &mut quoted);
                        quoted.push('"');
                        self.scalar_line(&number, &quoted);
                    }
                }
                WireType::StartGroup => {
                    self.open_block(&number);
                    open_groups.push(tag.field_number());
                }
                WireType::EndGroup => {
                    if open_groups.last() != Some(&tag.field_number()) {
                        break;
                    }
                    open_groups.pop();
                    self.close_block();
                }
            }
        }

        for _ in open_groups {
            self.close_block();
        }
    }
}

impl FieldVisitor for TextPrinter<'_> {
    fn visit_field(&mut self, _number: u32, name: &'static str, value: FieldValue<'_>) -> Result<()> {
        self.print_value(name, &value)
    }

    fn visit_map_entry(
        &mut self,
        _number: u32,
        name: &'static str,
        key: FieldValue<'_>,
        value: FieldValue<'_>,
    ) -> Result<()> {
        self.open_block(name);
        self.print_value("key", &key)?;
        self.print_value("value", &value)?;
        self.close_block();
        Ok(())
    }

    fn visit_unknown(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        if self.options.print_unknown_fields && !unknown.is_empty() {
            self.print_unknown_bytes(unknown.as_bytes(), self.options.unknown_depth_cap);
        }
        Ok(())
    }
}

/// Shallow structural check: every top-level field has a valid tag and fits,
/// and groups are balanced. Length-delimited payloads are not inspected.
fn looks_like_message(data: &[u8]) -> bool {
    let options = DecodeOptions::new().depth_limit(usize::MAX);
    let mut reader = WireReader::with_options(data, &options);
    loop {
        match reader.next_tag() {
            Ok(None) => return true,
            Ok(Some(tag)) => {
                if reader.skip_field(tag).is_err() {
                    return false;
                }
            }
            Err(_) => return false,
        }
    }
}

fn format_scalar(value: &FieldValue<'_>) -> String {
    match *value {
        FieldValue::Int32(v) | FieldValue::SInt32(v) | FieldValue::SFixed32(v) => v.to_string(),
        FieldValue::Int64(v) | FieldValue::SInt64(v) | FieldValue::SFixed64(v) => v.to_string(),
        FieldValue::UInt32(v) | FieldValue::Fixed32(v) => v.to_string(),
        FieldValue::UInt64(v) | FieldValue::Fixed64(v) => v.to_string(),
        FieldValue::Float(v) => format_float(v as f64, format!("{:?}", v)),
        FieldValue::Double(v) => format_float(v, format!("{:?}", v)),
        FieldValue::Bool(v) => v.to_string(),
        FieldValue::Enum { name: Some(name), .. } => name.to_string(),
        FieldValue::Enum { value, name: None } => value.to_string(),
        FieldValue::String(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            escape_str(s, &mut out);
            out.push('"');
            out
        }
        FieldValue::Bytes(b) => {
            let mut out = String::with_capacity(b.len() + 2);
            out.push('"');
            escape_bytes(b, &mut out);
            out.push('"');
            out
        }
        FieldValue::Message(_) | FieldValue::Group(_) => String::new(),
    }
}

/// `shortest` is the shortest round-trip rendering of the value at its own width.
fn format_float(value: f64, shortest: String) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        shortest
    }
}

fn escape_ascii(byte: u8, out: &mut String) {
    match byte {
        0x07 => out.push_str("\\a"),
        0x08 => out.push_str("\\b"),
        b'\t' => out.push_str("\\t"),
        b'\n' => out.push_str("\\n"),
        0x0B => out.push_str("\\v"),
        0x0C => out.push_str("\\f"),
        b'\r' => out.push_str("\\r"),
        b'"' => out.push_str("\\\""),
        b'\'' => out.push_str("\\'"),
        b'\\' => out.push_str("\\\\"),
        0x20..=0x7E => out.push(byte as char),
        _ => out.push_str(&format!("\\{:03o}", byte)),
    }
}

/// Escapes raw bytes; the result is pure ASCII
pub(crate) fn escape_bytes(bytes: &[u8], out: &mut String) {
    for &byte in bytes {
        escape_ascii(byte, out);
    }
}

/// Escapes a string, passing non-ASCII characters through
pub(crate) fn escape_str(s: &str, out: &mut String) {
    for c in s.chars() {
        if c.is_ascii() {
            escape_ascii(c as u8, out);
        } else {
            out.push(c);
        }
    }
}
