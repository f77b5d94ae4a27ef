//! Append-only cursor over a pre-sized output buffer.
//!
//! The caller computes the exact encoded size first and hands the writer a
//! buffer of that length. Every write is bounds-checked by slice indexing, so
//! a size-pass bug panics instead of corrupting memory.

use super::varint;
use super::{FieldTag, WireType};
use bytes::Buf;

/// Binary field writer
#[derive(Debug)]
pub struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    /// Creates a writer positioned at the start of `buf`
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far
    pub fn used(&self) -> usize {
        self.pos
    }

    /// Bytes still available
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    fn append(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    #[inline]
    fn append_slice(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    /// Copies pre-tagged bytes (typically an unknown field run) through unchanged
    pub fn append_unknown(&mut self, raw: &[u8]) {
        self.append_slice(raw);
    }

    /// Writes a field tag
    pub fn start_field(&mut self, field_number: u32, wire_type: WireType) {
        self.put_tag(FieldTag::new(field_number, wire_type));
    }

    /// Writes an already-built tag
    pub fn put_tag(&mut self, tag: FieldTag) {
        self.put_varint(tag.raw() as u64);
    }

    /// Writes a varint in minimal form
    #[inline]
    pub fn put_varint(&mut self, value: u64) {
        if value < 0x80 {
            self.append(value as u8);
        } else {
            let written = varint::encode_to_slice(value, &mut self.buf[self.pos..]);
            self.pos += written;
        }
    }

    /// Writes a signed value as a sign-extended varint (int32, int64, enum)
    pub fn put_signed_varint(&mut self, value: i64) {
        self.put_varint(value as u64);
    }

    /// Writes a zigzag-encoded sint32
    pub fn put_zigzag32(&mut self, value: i32) {
        self.put_varint(varint::zigzag_encode32(value) as u64);
    }

    /// Writes a zigzag-encoded sint64
    pub fn put_zigzag64(&mut self, value: i64) {
        self.put_varint(varint::zigzag_encode64(value));
    }

    /// Writes a bool as a single byte
    pub fn put_bool(&mut self, value: bool) {
        self.append(value as u8);
    }

    /// Writes four little-endian bytes
    pub fn put_fixed32(&mut self, value: u32) {
        self.append_slice(&value.to_le_bytes());
    }

    /// Writes eight little-endian bytes
    pub fn put_fixed64(&mut self, value: u64) {
        self.append_slice(&value.to_le_bytes());
    }

    /// Writes an IEEE-754 single as fixed32
    pub fn put_float(&mut self, value: f32) {
        self.put_fixed32(value.to_bits());
    }

    /// Writes an IEEE-754 double as fixed64
    pub fn put_double(&mut self, value: f64) {
        self.put_fixed64(value.to_bits());
    }

    /// Writes a length-prefixed UTF-8 string
    pub fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }

    /// Writes length-prefixed raw bytes
    pub fn put_bytes(&mut self, value: &[u8]) {
        self.put_varint(value.len() as u64);
        self.append_slice(value);
    }

    /// Writes length-prefixed bytes from a possibly non-contiguous buffer.
    ///
    /// Each chunk is copied in one piece, so a contiguous source costs a single
    /// copy; the output is identical to [`put_bytes`](Self::put_bytes).
    pub fn put_buf<B: Buf>(&mut self, mut value: B) {
        self.put_varint(value.remaining() as u64);
        while value.has_remaining() {
            let chunk = value.chunk();
            let len = chunk.len();
            self.append_slice(chunk);
            value.advance(len);
        }
    }
}
