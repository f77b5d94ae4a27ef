//! Byte-exact storage for fields a message does not recognise.
//!
//! Unknown fields are kept as the raw bytes that were read, tag included, in
//! arrival order. Re-encoding a message appends them verbatim after its known
//! fields, so data from newer schemas survives a decode/encode cycle.

use crate::wire::{FieldTag, WireReader};

/// Raw unknown-field bytes attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UnknownFieldSet {
    raw: Vec<u8>,
}

/// One top-level entry of an [`UnknownFieldSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownField<'a> {
    /// The entry's tag
    pub tag: FieldTag,
    /// The full encoded entry, tag included
    pub raw: &'a [u8],
}

impl UnknownFieldSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends already-encoded field bytes
    pub fn append_raw(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
    }

    /// The stored bytes, exactly as they will be re-encoded
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of stored bytes
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Drops all stored bytes
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Iterates over top-level entries.
    ///
    /// Iteration stops at the first entry that cannot be parsed, which only
    /// happens when bytes were added through [`append_raw`](Self::append_raw)
    /// without coming from a decoder.
    pub fn iter(&self) -> impl Iterator<Item = UnknownField<'_>> + '_ {
        let mut reader = WireReader::new(&self.raw);
        std::iter::from_fn(move || {
            let start = reader.position();
            let tag = reader.next_tag().ok()??;
            reader.skip_field(tag).ok()?;
            Some(UnknownField {
                tag,
                raw: reader.consumed_since(start),
            })
        })
    }
}
