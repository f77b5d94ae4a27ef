//! Low-level protobuf wire format.
//!
//! ## Wire Format Overview
//!
//! Each protobuf field is encoded as:
//! - A varint "tag" containing the field number and wire type
//! - The field data (format depends on wire type)
//!
//! Wire types:
//! - 0: VARINT (int32, int64, uint32, uint64, sint32, sint64, bool, enum)
//! - 1: I64 (fixed64, sfixed64, double)
//! - 2: LEN (string, bytes, embedded messages, packed repeated fields)
//! - 3/4: SGROUP/EGROUP (deprecated groups)
//! - 5: I32 (fixed32, sfixed32, float)

pub mod reader;
pub mod varint;
pub mod writer;

use crate::error::{Error, Result};
use std::fmt;

pub use reader::WireReader;
pub use writer::WireWriter;

/// Maximum valid protobuf field number (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Protobuf wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Variable-length integer
    Varint = 0,
    /// 64-bit fixed-width
    Fixed64 = 1,
    /// Length-delimited (strings, bytes, embedded messages)
    LengthDelimited = 2,
    /// Start group (deprecated)
    StartGroup = 3,
    /// End group (deprecated)
    EndGroup = 4,
    /// 32-bit fixed-width
    Fixed32 = 5,
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            _ => Err(Error::malformed(0, format!("unknown wire type: {}", value))),
        }
    }
}

/// A field number paired with its wire type.
///
/// The raw encoding is `(field_number << 3) | wire_type`, written as a varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldTag {
    field_number: u32,
    wire_type: WireType,
}

impl FieldTag {
    /// Creates a tag.
    ///
    /// # Panics
    ///
    /// Panics if `field_number` is outside `1..=MAX_FIELD_NUMBER`; field
    /// numbers handed to the writer come from schema code, not from input.
    pub fn new(field_number: u32, wire_type: WireType) -> Self {
        assert!(
            (1..=MAX_FIELD_NUMBER).contains(&field_number),
            "field number {} out of range",
            field_number
        );
        Self {
            field_number,
            wire_type,
        }
    }

    /// Splits a raw tag value read from input.
    pub fn from_raw(raw: u64) -> Result<Self> {
        let wire_type = WireType::try_from((raw & 0x07) as u8)?;
        let field_number = raw >> 3;

        if field_number == 0 || field_number > MAX_FIELD_NUMBER as u64 {
            return Err(Error::malformed(
                0,
                format!("invalid field number {}", field_number),
            ));
        }

        Ok(Self {
            field_number: field_number as u32,
            wire_type,
        })
    }

    /// Returns the field number
    pub fn field_number(&self) -> u32 {
        self.field_number
    }

    /// Returns the wire type
    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Returns the raw tag value
    pub fn raw(&self) -> u32 {
        (self.field_number << 3) | self.wire_type as u32
    }

    /// Number of bytes the tag occupies on the wire
    pub fn encoded_size(&self) -> usize {
        varint::encoded_size(self.raw() as u64)
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.field_number, self.wire_type)
    }
}
