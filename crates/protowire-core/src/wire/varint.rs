//! Base-128 variable-length integers and the zigzag transform.
//!
//! Each byte carries seven data bits, least significant group first, with the
//! high bit set on every byte except the last. Encoding always produces the
//! shortest form; decoding accepts padded forms as long as they stay within
//! ten bytes.

use super::writer::WireWriter;
use crate::error::{Error, Result};

/// Maximum encoded length of a 64-bit varint
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes needed to encode `value` in minimal form.
#[inline]
pub fn encoded_size(value: u64) -> usize {
    // One byte per started group of seven significant bits; zero still takes a byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Encode `value` into the writer.
#[inline]
pub fn encode(value: u64, writer: &mut WireWriter<'_>) {
    writer.put_varint(value);
}

/// Encode `value` into the front of `out`, returning the number of bytes written.
///
/// # Panics
///
/// Panics if `out` is shorter than [`encoded_size`]`(value)`.
pub fn encode_to_slice(value: u64, out: &mut [u8]) -> usize {
    if value < 0x80 {
        out[0] = value as u8;
        return 1;
    }

    let len = encoded_size(value);
    let out = &mut out[..len];
    let mut v = value;
    for byte in out[..len - 1].iter_mut() {
        *byte = (v as u8 & 0x7F) | 0x80;
        v >>= 7;
    }
    out[len - 1] = v as u8;
    len
}

/// Decode a varint from the given bytes.
///
/// Returns the decoded value and the number of bytes consumed. Offsets in
/// errors are relative to `data`.
pub fn decode(data: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in data.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(Error::malformed(i, "varint longer than 10 bytes"));
        }

        // Bits past the 64th (only reachable on the tenth byte) are dropped.
        result |= ((byte & 0x7F) as u64).checked_shl(shift).unwrap_or(0);
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    if data.len() >= MAX_VARINT_LEN {
        Err(Error::malformed(MAX_VARINT_LEN, "varint longer than 10 bytes"))
    } else {
        Err(Error::truncated(data.len()))
    }
}

/// Map a signed 32-bit integer onto an unsigned one, keeping small magnitudes small.
#[inline]
pub fn zigzag_encode32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Map a signed 64-bit integer onto an unsigned one, keeping small magnitudes small.
#[inline]
pub fn zigzag_encode64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode32`].
#[inline]
pub fn zigzag_decode32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Inverse of [`zigzag_encode64`].
#[inline]
pub fn zigzag_decode64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}
