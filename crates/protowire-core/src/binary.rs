//! Binary encoding and decoding drivers.
//!
//! Encoding runs in two passes over [`Message::traverse`]: a size pass that
//! computes the exact output length, then a write pass into a buffer of that
//! length. Decoding pulls tags through a [`WireReader`] and offers each one to
//! [`Message::merge_field`]; anything the message declines is skipped and its
//! raw bytes are appended to the unknown-field set.

use crate::error::{Error, Result};
use crate::message::{FieldValue, FieldVisitor, Message};
use crate::unknown::UnknownFieldSet;
use crate::wire::reader::unless_mismatched;
use crate::wire::{varint, FieldTag, WireReader, WireType, WireWriter};

/// Default binary nesting limit
pub const DEFAULT_DEPTH_LIMIT: usize = 100;

/// Options for binary decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum nesting of messages and groups
    pub depth_limit: usize,
    /// Drop unknown fields instead of preserving them
    pub discard_unknown_fields: bool,
    /// Skip the required-field check after decoding
    pub partial: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            discard_unknown_fields: false,
            partial: false,
        }
    }
}

impl DecodeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    pub fn depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    /// Drop unknown fields while decoding
    pub fn discard_unknown_fields(mut self, discard: bool) -> Self {
        self.discard_unknown_fields = discard;
        self
    }

    /// Accept messages with missing required fields
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }
}

fn len_prefixed_size(len: usize) -> usize {
    varint::encoded_size(len as u64) + len
}

fn tag_size(number: u32, wire_type: WireType) -> usize {
    FieldTag::new(number, wire_type).encoded_size()
}

/// Size of a value without its tag
fn value_size(value: &FieldValue<'_>) -> Result<usize> {
    Ok(match *value {
        FieldValue::Int32(v) => varint::encoded_size(v as i64 as u64),
        FieldValue::Int64(v) => varint::encoded_size(v as u64),
        FieldValue::UInt32(v) => varint::encoded_size(v as u64),
        FieldValue::UInt64(v) => varint::encoded_size(v),
        FieldValue::SInt32(v) => varint::encoded_size(varint::zigzag_encode32(v) as u64),
        FieldValue::SInt64(v) => varint::encoded_size(varint::zigzag_encode64(v)),
        FieldValue::Enum { value, .. } => varint::encoded_size(value as i64 as u64),
        FieldValue::Bool(_) => 1,
        FieldValue::Fixed32(_) | FieldValue::SFixed32(_) | FieldValue::Float(_) => 4,
        FieldValue::Fixed64(_) | FieldValue::SFixed64(_) | FieldValue::Double(_) => 8,
        FieldValue::String(s) => len_prefixed_size(s.len()),
        FieldValue::Bytes(b) => len_prefixed_size(b.len()),
        FieldValue::Message(m) => len_prefixed_size(encoded_len(m)?),
        // Body only; the caller adds both group tags.
        FieldValue::Group(m) => encoded_len(m)?,
    })
}

fn map_entry_size(key: &FieldValue<'_>, value: &FieldValue<'_>) -> Result<usize> {
    Ok(tag_size(1, key.wire_type())
        + value_size(key)?
        + tag_size(2, value.wire_type())
        + value_size(value)?)
}

struct SizeVisitor {
    size: usize,
}

impl FieldVisitor for SizeVisitor {
    fn visit_field(&mut self, number: u32, _name: &'static str, value: FieldValue<'_>) -> Result<()> {
        let tag = tag_size(number, value.wire_type());
        self.size += match value {
            FieldValue::Group(_) => 2 * tag + value_size(&value)?,
            _ => tag + value_size(&value)?,
        };
        Ok(())
    }

    fn visit_packed(&mut self, number: u32, _name: &'static str, values: &[FieldValue<'_>]) -> Result<()> {
        let mut payload = 0;
        for value in values {
            payload += value_size(value)?;
        }
        self.size += tag_size(number, WireType::LengthDelimited) + len_prefixed_size(payload);
        Ok(())
    }

    fn visit_map_entry(
        &mut self,
        number: u32,
        _name: &'static str,
        key: FieldValue<'_>,
        value: FieldValue<'_>,
    ) -> Result<()> {
        self.size += tag_size(number, WireType::LengthDelimited)
            + len_prefixed_size(map_entry_size(&key, &value)?);
        Ok(())
    }

    fn visit_unknown(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        self.size += unknown.len();
        Ok(())
    }
}

struct EncodeVisitor<'w, 'b> {
    writer: &'w mut WireWriter<'b>,
}

impl EncodeVisitor<'_, '_> {
    fn put_value(&mut self, value: &FieldValue<'_>) -> Result<()> {
        let w = &mut *self.writer;
        match *value {
            FieldValue::Int32(v) => w.put_signed_varint(v as i64),
            FieldValue::Int64(v) => w.put_signed_varint(v),
            FieldValue::UInt32(v) => w.put_varint(v as u64),
            FieldValue::UInt64(v) => w.put_varint(v),
            FieldValue::SInt32(v) => w.put_zigzag32(v),
            FieldValue::SInt64(v) => w.put_zigzag64(v),
            FieldValue::Enum { value, .. } => w.put_signed_varint(value as i64),
            FieldValue::Bool(v) => w.put_bool(v),
            FieldValue::Fixed32(v) => w.put_fixed32(v),
            FieldValue::SFixed32(v) => w.put_fixed32(v as u32),
            FieldValue::Float(v) => w.put_float(v),
            FieldValue::Fixed64(v) => w.put_fixed64(v),
            FieldValue::SFixed64(v) => w.put_fixed64(v as u64),
            FieldValue::Double(v) => w.put_double(v),
            FieldValue::String(s) => w.put_str(s),
            FieldValue::Bytes(b) => w.put_bytes(b),
            FieldValue::Message(m) => {
                w.put_varint(encoded_len(m)? as u64);
                m.traverse(self)?;
            }
            FieldValue::Group(m) => m.traverse(self)?,
        }
        Ok(())
    }
}

impl FieldVisitor for EncodeVisitor<'_, '_> {
    fn visit_field(&mut self, number: u32, _name: &'static str, value: FieldValue<'_>) -> Result<()> {
        self.writer.start_field(number, value.wire_type());
        self.put_value(&value)?;
        if let FieldValue::Group(_) = value {
            self.writer.start_field(number, WireType::EndGroup);
        }
        Ok(())
    }

    fn visit_packed(&mut self, number: u32, _name: &'static str, values: &[FieldValue<'_>]) -> Result<()> {
        let mut payload = 0;
        for value in values {
            payload += value_size(value)?;
        }
        self.writer.start_field(number, WireType::LengthDelimited);
        self.writer.put_varint(payload as u64);
        for value in values {
            self.put_value(value)?;
        }
        Ok(())
    }

    fn visit_map_entry(
        &mut self,
        number: u32,
        _name: &'static str,
        key: FieldValue<'_>,
        value: FieldValue<'_>,
    ) -> Result<()> {
        self.writer.start_field(number, WireType::LengthDelimited);
        self.writer.put_varint(map_entry_size(&key, &value)? as u64);
        self.visit_field(1, "key", key)?;
        self.visit_field(2, "value", value)
    }

    fn visit_unknown(&mut self, unknown: &UnknownFieldSet) -> Result<()> {
        self.writer.append_unknown(unknown.as_bytes());
        Ok(())
    }
}

/// Exact size of the binary encoding of `message`
pub fn encoded_len(message: &dyn Message) -> Result<usize> {
    let mut sizer = SizeVisitor { size: 0 };
    message.traverse(&mut sizer)?;
    Ok(sizer.size)
}

/// Encodes `message` without checking required fields
pub fn encode(message: &dyn Message) -> Result<Vec<u8>> {
    let size = encoded_len(message)?;
    let mut buf = vec![0u8; size];
    let mut writer = WireWriter::new(&mut buf);
    message.traverse(&mut EncodeVisitor {
        writer: &mut writer,
    })?;
    assert_eq!(
        writer.used(),
        size,
        "size pass and write pass disagree for {}",
        message.full_name()
    );
    Ok(buf)
}

/// Merges binary input into `message` without checking required fields
pub fn merge(message: &mut dyn Message, bytes: &[u8], options: &DecodeOptions) -> Result<()> {
    let mut reader = WireReader::with_options(bytes, options);
    merge_fields(&mut reader, message, None)
}

/// Reads fields into `message` until the end of the reader's current region,
/// or until the end tag of `group` when decoding a group body.
pub(crate) fn merge_fields(
    reader: &mut WireReader<'_>,
    message: &mut dyn Message,
    group: Option<u32>,
) -> Result<()> {
    loop {
        let start = reader.position();
        let Some(tag) = reader.next_tag()? else {
            return match group {
                None => Ok(()),
                Some(number) => Err(Error::malformed(
                    start,
                    format!("group {} is missing its end tag", number),
                )),
            };
        };

        if tag.wire_type() == WireType::EndGroup {
            return match group {
                Some(number) if number == tag.field_number() => Ok(()),
                _ => Err(Error::malformed(
                    start,
                    format!("unexpected end tag for group {}", tag.field_number()),
                )),
            };
        }

        // A known number with the wrong wire type is kept as unknown, as long
        // as `merge_field` failed before consuming anything.
        let value_start = reader.position();
        let merged = message.merge_field(tag, reader);
        let known = unless_mismatched(merged, reader.position() != value_start)?;
        if known != Some(true) {
            reader.skip_field(tag)?;
            if !reader.discards_unknown() {
                message
                    .unknown_fields_mut()
                    .append_raw(reader.consumed_since(start));
            }
        }
    }
}
