//! Cursor over binary protobuf input.
//!
//! The reader tracks the current offset, the end of the innermost
//! length-delimited region (`limit`) and the message nesting depth. Nested
//! messages narrow the limit instead of creating sub-readers, so offsets in
//! errors are always relative to the start of the original buffer.
//!
//! Generated code drives the reader from `Message::merge_field`, calling the
//! typed `read_*` method that matches the field's declared type.

use super::{varint, FieldTag, WireType};
use crate::binary::{self, DecodeOptions};
use crate::error::{Error, Result};
use crate::message::Message;

/// Binary field reader
#[derive(Debug)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
    limit: usize,
    depth: usize,
    depth_limit: usize,
    discard_unknown: bool,
}

impl<'a> WireReader<'a> {
    /// Creates a reader over `data` with default options
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, &DecodeOptions::default())
    }

    /// Creates a reader over `data` with custom options
    pub fn with_options(data: &'a [u8], options: &DecodeOptions) -> Self {
        Self {
            data,
            pos: 0,
            limit: data.len(),
            depth: 0,
            depth_limit: options.depth_limit,
            discard_unknown: options.discard_unknown_fields,
        }
    }

    /// Current byte offset from the start of the input
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left before the current limit
    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// Current message nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn discards_unknown(&self) -> bool {
        self.discard_unknown
    }

    /// Input bytes from `start` up to the current position
    pub(crate) fn consumed_since(&self, start: usize) -> &'a [u8] {
        &self.data[start..self.pos]
    }

    fn relocate(&self, err: Error) -> Error {
        match err {
            Error::Truncated { offset } => Error::truncated(self.pos + offset),
            Error::Malformed { offset, details } => Error::Malformed {
                offset: self.pos + offset,
                details,
            },
            other => other,
        }
    }

    /// Reads one raw varint
    pub fn read_raw_varint(&mut self) -> Result<u64> {
        let (value, len) =
            varint::decode(&self.data[self.pos..self.limit]).map_err(|e| self.relocate(e))?;
        self.pos += len;
        Ok(value)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if self.remaining() < N {
            return Err(Error::truncated(self.limit));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn read_length(&mut self) -> Result<usize> {
        let start = self.pos;
        let len = self.read_raw_varint()?;
        if len > self.remaining() as u64 {
            return Err(Error::truncated(start));
        }
        Ok(len as usize)
    }

    /// Reads a length prefix and returns the bytes it covers
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length()?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Reads the next tag, or `None` at the end of the current region
    pub fn next_tag(&mut self) -> Result<Option<FieldTag>> {
        if self.pos >= self.limit {
            return Ok(None);
        }
        let start = self.pos;
        let raw = self.read_raw_varint()?;
        FieldTag::from_raw(raw)
            .map(Some)
            .map_err(|e| match e {
                Error::Malformed { details, .. } => Error::malformed(start, details),
                other => other,
            })
    }

    /// Fails with [`Error::WireTypeMismatch`] unless `tag` carries `wire_type`.
    ///
    /// Nothing is consumed. Every typed `read_*` starts with this check, and
    /// `merge_field` implementations call it before touching state that a
    /// mismatched field must leave alone.
    pub fn expect_wire_type(&self, tag: FieldTag, wire_type: WireType) -> Result<()> {
        if tag.wire_type() != wire_type {
            return Err(Error::WireTypeMismatch {
                offset: self.pos,
                field_number: tag.field_number(),
                actual: tag.wire_type(),
                expected: wire_type,
            });
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.depth_limit {
            return Err(Error::RecursionLimitExceeded {
                limit: self.depth_limit,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Runs `body` with the limit narrowed to the next length-delimited region.
    fn within_length<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let len = self.read_length()?;
        let saved = self.limit;
        self.limit = self.pos + len;
        let result = body(self);
        if result.is_ok() && self.pos != self.limit {
            return Err(Error::malformed(self.pos, "nested data ended early"));
        }
        self.limit = saved;
        result
    }

    /// Consumes the value belonging to `tag` without interpreting it.
    ///
    /// Groups are skipped iteratively with an explicit stack, but their nesting
    /// still counts against the depth limit.
    pub fn skip_field(&mut self, tag: FieldTag) -> Result<()> {
        match tag.wire_type() {
            WireType::Varint => {
                self.read_raw_varint()?;
            }
            WireType::Fixed64 => {
                self.read_array::<8>()?;
            }
            WireType::Fixed32 => {
                self.read_array::<4>()?;
            }
            WireType::LengthDelimited => {
                self.read_length_delimited()?;
            }
            WireType::EndGroup => {
                return Err(Error::malformed(self.pos, "unmatched end-group tag"));
            }
            WireType::StartGroup => {
                let mut open = vec![tag.field_number()];
                while let Some(&number) = open.last() {
                    if self.depth + open.len() > self.depth_limit {
                        return Err(Error::RecursionLimitExceeded {
                            limit: self.depth_limit,
                        });
                    }
                    let start = self.pos;
                    let Some(inner) = self.next_tag()? else {
                        return Err(Error::malformed(
                            start,
                            format!("group {} is missing its end tag", number),
                        ));
                    };
                    match inner.wire_type() {
                        WireType::EndGroup if inner.field_number() == number => {
                            open.pop();
                        }
                        WireType::EndGroup => {
                            return Err(Error::malformed(
                                start,
                                format!(
                                    "end tag for group {} does not match open group {}",
                                    inner.field_number(),
                                    number
                                ),
                            ));
                        }
                        WireType::StartGroup => open.push(inner.field_number()),
                        _ => self.skip_field(inner)?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Reads an int32 field
    pub fn read_int32(&mut self, tag: FieldTag) -> Result<i32> {
        self.expect_wire_type(tag, WireType::Varint)?;
        Ok(self.read_raw_varint()? as i32)
    }

    /// Reads an int64 field
    pub fn read_int64(&mut self, tag: FieldTag) -> Result<i64> {
        self.expect_wire_type(tag, WireType::Varint)?;
        Ok(self.read_raw_varint()? as i64)
    }

    /// Reads a uint32 field
    pub fn read_uint32(&mut self, tag: FieldTag) -> Result<u32> {
        self.expect_wire_type(tag, WireType::Varint)?;
        Ok(self.read_raw_varint()? as u32)
    }

    /// Reads a uint64 field
    pub fn read_uint64(&mut self, tag: FieldTag) -> Result<u64> {
        self.expect_wire_type(tag, WireType::Varint)?;
        self.read_raw_varint()
    }

    /// Reads a zigzag-encoded sint32 field
    pub fn read_sint32(&mut self, tag: FieldTag) -> Result<i32> {
        self.expect_wire_type(tag, WireType::Varint)?;
        Ok(varint::zigzag_decode32(self.read_raw_varint()? as u32))
    }

    /// Reads a zigzag-encoded sint64 field
    pub fn read_sint64(&mut self, tag: FieldTag) -> Result<i64> {
        self.expect_wire_type(tag, WireType::Varint)?;
        Ok(varint::zigzag_decode64(self.read_raw_varint()?))
    }

    /// Reads a bool field; any non-zero varint is true
    pub fn read_bool(&mut self, tag: FieldTag) -> Result<bool> {
        self.expect_wire_type(tag, WireType::Varint)?;
        Ok(self.read_raw_varint()? != 0)
    }

    /// Reads an enum field as its raw number
    pub fn read_enum(&mut self, tag: FieldTag) -> Result<i32> {
        self.read_int32(tag)
    }

    /// Reads a fixed32 field
    pub fn read_fixed32(&mut self, tag: FieldTag) -> Result<u32> {
        self.expect_wire_type(tag, WireType::Fixed32)?;
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Reads a fixed64 field
    pub fn read_fixed64(&mut self, tag: FieldTag) -> Result<u64> {
        self.expect_wire_type(tag, WireType::Fixed64)?;
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Reads an sfixed32 field
    pub fn read_sfixed32(&mut self, tag: FieldTag) -> Result<i32> {
        Ok(self.read_fixed32(tag)? as i32)
    }

    /// Reads an sfixed64 field
    pub fn read_sfixed64(&mut self, tag: FieldTag) -> Result<i64> {
        Ok(self.read_fixed64(tag)? as i64)
    }

    /// Reads a float field
    pub fn read_float(&mut self, tag: FieldTag) -> Result<f32> {
        Ok(f32::from_bits(self.read_fixed32(tag)?))
    }

    /// Reads a double field
    pub fn read_double(&mut self, tag: FieldTag) -> Result<f64> {
        Ok(f64::from_bits(self.read_fixed64(tag)?))
    }

    /// Reads a string field, rejecting invalid UTF-8
    pub fn read_string(&mut self, tag: FieldTag) -> Result<String> {
        self.expect_wire_type(tag, WireType::LengthDelimited)?;
        let start = self.pos;
        let bytes = self.read_length_delimited()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| Error::malformed(start, "string field is not valid UTF-8"))
    }

    /// Reads a bytes field
    pub fn read_bytes(&mut self, tag: FieldTag) -> Result<Vec<u8>> {
        self.read_bytes_ref(tag).map(<[u8]>::to_vec)
    }

    /// Reads a bytes field without copying
    pub fn read_bytes_ref(&mut self, tag: FieldTag) -> Result<&'a [u8]> {
        self.expect_wire_type(tag, WireType::LengthDelimited)?;
        self.read_length_delimited()
    }

    /// Merges a length-delimited sub-message into `message`
    pub fn read_message(&mut self, tag: FieldTag, message: &mut dyn Message) -> Result<()> {
        self.expect_wire_type(tag, WireType::LengthDelimited)?;
        self.enter()?;
        self.within_length(|r| binary::merge_fields(r, message, None))?;
        self.leave();
        Ok(())
    }

    /// Merges a length-delimited sub-message into `slot`, creating it on first use.
    ///
    /// A mismatched wire type leaves `slot` untouched.
    pub fn read_optional_message<M: Message + Default>(
        &mut self,
        tag: FieldTag,
        slot: &mut Option<M>,
    ) -> Result<()> {
        self.expect_wire_type(tag, WireType::LengthDelimited)?;
        self.read_message(tag, slot.get_or_insert_with(M::default))
    }

    /// Merges a group into `message`, reading up to the matching end tag
    pub fn read_group(&mut self, tag: FieldTag, message: &mut dyn Message) -> Result<()> {
        self.expect_wire_type(tag, WireType::StartGroup)?;
        self.enter()?;
        binary::merge_fields(self, message, Some(tag.field_number()))?;
        self.leave();
        Ok(())
    }

    /// Reads one map entry (key = field 1, value = field 2).
    ///
    /// Missing keys or values take their default. Other fields, and keys or
    /// values with the wrong wire type, are skipped.
    pub fn read_map_entry<K, V>(
        &mut self,
        tag: FieldTag,
        mut read_key: impl FnMut(&mut Self, FieldTag) -> Result<K>,
        mut read_value: impl FnMut(&mut Self, FieldTag) -> Result<V>,
    ) -> Result<(K, V)>
    where
        K: Default,
        V: Default,
    {
        self.expect_wire_type(tag, WireType::LengthDelimited)?;
        self.enter()?;
        let entry = self.within_length(|r| {
            let mut key = K::default();
            let mut value = V::default();
            while let Some(inner) = r.next_tag()? {
                let start = r.pos;
                match inner.field_number() {
                    1 => {
                        let read = read_key(r, inner);
                        match unless_mismatched(read, r.pos != start)? {
                            Some(k) => key = k,
                            None => r.skip_field(inner)?,
                        }
                    }
                    2 => {
                        let read = read_value(r, inner);
                        match unless_mismatched(read, r.pos != start)? {
                            Some(v) => value = v,
                            None => r.skip_field(inner)?,
                        }
                    }
                    _ => r.skip_field(inner)?,
                }
            }
            Ok((key, value))
        })?;
        self.leave();
        Ok(entry)
    }

    /// Reads a repeated scalar element in either packed or unpacked form.
    ///
    /// `element` is the wire type of a single unpacked element.
    pub fn read_repeated<T>(
        &mut self,
        tag: FieldTag,
        element: WireType,
        out: &mut Vec<T>,
        mut read: impl FnMut(&mut Self, FieldTag) -> Result<T>,
    ) -> Result<()> {
        if tag.wire_type() == WireType::LengthDelimited && element != WireType::LengthDelimited {
            let element_tag = FieldTag::new(tag.field_number(), element);
            self.within_length(|r| {
                while r.remaining() > 0 {
                    out.push(read(r, element_tag)?);
                }
                Ok(())
            })
        } else {
            out.push(read(self, tag)?);
            Ok(())
        }
    }
}

/// Maps a wire-type mismatch raised before anything was `consumed` to `None`.
pub(crate) fn unless_mismatched<T>(result: Result<T>, consumed: bool) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::WireTypeMismatch { .. }) if !consumed => Ok(None),
        Err(err) => Err(err),
    }
}
