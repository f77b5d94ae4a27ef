//! The contract between schema-generated message types and the codecs.
//!
//! ## Architecture
//!
//! Generated code implements [`Message`] for every message type. The codecs
//! never see concrete field layouts; instead they rely on two callbacks:
//!
//! - [`Message::traverse`] pushes every present field, in field-number order,
//!   into a [`FieldVisitor`]. The binary size pass, binary encoder, text
//!   printer and initialization checker are all visitors.
//! - [`Message::merge_field`] and [`Message::merge_text_field`] pull one field
//!   out of a binary reader or text parser. Returning `false` marks the field
//!   as unknown to the schema.
//!
//! [`NamedMessage`] adds what only a sized, concrete type can provide: a
//! constant full name, construction, equality and hashing. [`MessageExt`]
//! layers the everyday encode/decode entry points over both.

use crate::binary::{self, DecodeOptions};
use crate::error::Result;
use crate::required;
use crate::text::{self, TextDecodeOptions, TextEncodeOptions, TextParser};
use crate::unknown::UnknownFieldSet;
use crate::wire::{FieldTag, WireReader, WireType};
use std::any::Any;
use std::fmt;
use std::hash::Hash;

/// Upcast to [`Any`] for downcasting trait objects back to concrete messages
pub trait AsAny: Any {
    /// Borrows `self` as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrows `self` as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One field value handed to a [`FieldVisitor`]
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    /// `int32`
    Int32(i32),
    /// `int64`
    Int64(i64),
    /// `uint32`
    UInt32(u32),
    /// `uint64`
    UInt64(u64),
    /// `sint32` (zigzag on the wire)
    SInt32(i32),
    /// `sint64` (zigzag on the wire)
    SInt64(i64),
    /// `fixed32`
    Fixed32(u32),
    /// `fixed64`
    Fixed64(u64),
    /// `sfixed32`
    SFixed32(i32),
    /// `sfixed64`
    SFixed64(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `bool`
    Bool(bool),
    /// An enum number, with its symbolic name when the schema knows it
    Enum {
        /// Numeric value
        value: i32,
        /// Symbolic name, if declared
        name: Option<&'static str>,
    },
    /// `string`
    String(&'a str),
    /// `bytes`
    Bytes(&'a [u8]),
    /// A length-delimited sub-message
    Message(&'a dyn Message),
    /// A group-encoded sub-message
    Group(&'a dyn Message),
}

impl FieldValue<'_> {
    /// Wire type used for a single (unpacked) value
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Int32(_)
            | Self::Int64(_)
            | Self::UInt32(_)
            | Self::UInt64(_)
            | Self::SInt32(_)
            | Self::SInt64(_)
            | Self::Bool(_)
            | Self::Enum { .. } => WireType::Varint,
            Self::Fixed64(_) | Self::SFixed64(_) | Self::Double(_) => WireType::Fixed64,
            Self::Fixed32(_) | Self::SFixed32(_) | Self::Float(_) => WireType::Fixed32,
            Self::String(_) | Self::Bytes(_) | Self::Message(_) => WireType::LengthDelimited,
            Self::Group(_) => WireType::StartGroup,
        }
    }
}

/// Receives fields from [`Message::traverse`]
pub trait FieldVisitor {
    /// A singular field or one element of an unpacked repeated field
    fn visit_field(&mut self, number: u32, name: &'static str, value: FieldValue<'_>)
        -> Result<()>;

    /// A packed repeated field; `values` is never empty.
    ///
    /// Visitors that do not care about packing see each element in turn.
    fn visit_packed(
        &mut self,
        number: u32,
        name: &'static str,
        values: &[FieldValue<'_>],
    ) -> Result<()> {
        for value in values {
            self.visit_field(number, name, *value)?;
        }
        Ok(())
    }

    /// One entry of a map field
    fn visit_map_entry(
        &mut self,
        number: u32,
        name: &'static str,
        key: FieldValue<'_>,
        value: FieldValue<'_>,
    ) -> Result<()>;

    /// The message's unknown fields, visited last
    fn visit_unknown(&mut self, unknown: &UnknownFieldSet) -> Result<()>;
}

/// A schema-defined message as seen by the codecs
pub trait Message: AsAny + fmt::Debug + Send + Sync {
    /// Fully-qualified message name, e.g. `google.protobuf.Duration`
    fn full_name(&self) -> &'static str;

    /// Visits every present field in field-number order, then the unknown fields
    fn traverse(&self, visitor: &mut dyn FieldVisitor) -> Result<()>;

    /// Merges one binary field. Returns `Ok(false)` if `tag` is not part of the schema.
    ///
    /// A [`WireTypeMismatch`](crate::Error::WireTypeMismatch) returned before
    /// `reader` moves keeps the field as unknown, so state must not change
    /// ahead of the wire-type check (see
    /// [`WireReader::read_optional_message`]).
    fn merge_field(&mut self, tag: FieldTag, reader: &mut WireReader<'_>) -> Result<bool>;

    /// Merges one text field. Returns `Ok(false)` if `name` is not part of the schema.
    ///
    /// Extensions arrive with their brackets, e.g. `[pkg.ext_name]`.
    fn merge_text_field(&mut self, name: &str, parser: &mut TextParser<'_>) -> Result<bool> {
        let _ = (name, parser);
        Ok(false)
    }

    /// Text name of field `number`, if the schema declares it.
    ///
    /// The parser uses this to route numeric field names such as `1: 5` to
    /// [`merge_text_field`](Self::merge_text_field).
    fn text_field_name(&self, number: u32) -> Option<&'static str> {
        let _ = number;
        None
    }

    /// True when this message's own required fields are set.
    ///
    /// Nested messages are checked separately by [`required::is_initialized`].
    fn required_fields_set(&self) -> bool {
        true
    }

    /// Unknown fields captured during decoding
    fn unknown_fields(&self) -> &UnknownFieldSet;

    /// Mutable access to the unknown fields
    fn unknown_fields_mut(&mut self) -> &mut UnknownFieldSet;
}

/// A concrete, sized message type with a compile-time name
pub trait NamedMessage: Message + Default + Clone + PartialEq + Hash {
    /// Fully-qualified message name
    const NAME: &'static str;

    /// Decodes a complete message, failing if required fields are missing
    fn decode(bytes: &[u8]) -> Result<Self> {
        required::deserialize(bytes, false)
    }

    /// Decodes whatever fields are present
    fn decode_partial(bytes: &[u8]) -> Result<Self> {
        required::deserialize(bytes, true)
    }

    /// Decodes with explicit options
    fn decode_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<Self> {
        required::deserialize_with_options(bytes, options)
    }

    /// Parses text format with default options
    fn from_text(input: &str) -> Result<Self> {
        Self::from_text_with(input, &TextDecodeOptions::default())
    }

    /// Parses text format with explicit options
    fn from_text_with(input: &str, options: &TextDecodeOptions) -> Result<Self> {
        let mut message = Self::default();
        text::merge(&mut message, input, options)?;
        Ok(message)
    }
}

/// Encode/decode conveniences available on every message
pub trait MessageExt {
    /// Whether every required field, including those of nested messages, is set
    fn is_initialized(&self) -> bool;

    /// Size of the binary encoding in bytes
    fn encoded_len(&self) -> Result<usize>;

    /// Encodes to binary, failing if required fields are missing
    fn encode_to_vec(&self) -> Result<Vec<u8>>;

    /// Encodes whatever fields are present
    fn encode_partial_to_vec(&self) -> Result<Vec<u8>>;

    /// Merges binary input into this message without checking required fields
    fn merge_from_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Renders text format with default options
    fn to_text(&self) -> Result<String>;

    /// Renders text format with explicit options
    fn to_text_with(&self, options: &TextEncodeOptions) -> Result<String>;
}

macro_rules! impl_message_ext {
    () => {
        fn is_initialized(&self) -> bool {
            required::is_initialized(self)
        }

        fn encoded_len(&self) -> Result<usize> {
            binary::encoded_len(self)
        }

        fn encode_to_vec(&self) -> Result<Vec<u8>> {
            required::serialize(self, false)
        }

        fn encode_partial_to_vec(&self) -> Result<Vec<u8>> {
            required::serialize(self, true)
        }

        fn merge_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
            binary::merge(self, bytes, &DecodeOptions::default())
        }

        fn to_text(&self) -> Result<String> {
            text::print(self, &TextEncodeOptions::default())
        }

        fn to_text_with(&self, options: &TextEncodeOptions) -> Result<String> {
            text::print(self, options)
        }
    };
}

impl<M: Message> MessageExt for M {
    impl_message_ext!();
}

impl MessageExt for dyn Message {
    impl_message_ext!();
}

/// A message with no declared fields.
///
/// Every field it sees is unknown, which makes it a schema-less view of any
/// binary payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EmptyMessage {
    unknown: UnknownFieldSet,
}

impl Message for EmptyMessage {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, visitor: &mut dyn FieldVisitor) -> Result<()> {
        visitor.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, _tag: FieldTag, _reader: &mut WireReader<'_>) -> Result<bool> {
        Ok(false)
    }

    fn unknown_fields(&self) -> &UnknownFieldSet {
        &self.unknown
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFieldSet {
        &mut self.unknown
    }
}

impl NamedMessage for EmptyMessage {
    const NAME: &'static str = "protowire.EmptyMessage";
}
