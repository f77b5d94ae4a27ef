//! Error types for the protowire-core library.
//!
//! Every failure a caller can recover from is a variant of [`Error`]. The
//! variants are grouped by the codec that raises them so callers can match on
//! the exact condition (a truncated buffer is not the same as a malformed tag).
//!
//! There is no variant for writing past the end of a pre-sized output buffer.
//! The size pass fixes the capacity, and an overflow panics.

use crate::wire::WireType;
use thiserror::Error;

/// Result type alias for protowire operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all protowire operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Binary input ended before a declared length, fixed-width value or varint was complete
    #[error("truncated protobuf input at offset {offset}")]
    Truncated {
        /// Byte offset where more data was expected
        offset: usize,
    },

    /// Binary input is structurally invalid
    #[error("malformed protobuf data at offset {offset}: {details}")]
    Malformed {
        /// Byte offset where the error occurred
        offset: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// A field arrived with a wire type other than the one its declaration uses.
    ///
    /// The decode loop keeps such fields as unknown, so callers only see this
    /// from a [`WireReader`](crate::WireReader) driven directly.
    #[error("field {field_number} has wire type {actual:?}, expected {expected:?} at offset {offset}")]
    WireTypeMismatch {
        /// Byte offset of the field value
        offset: usize,
        /// Field number from the tag
        field_number: u32,
        /// Wire type from the tag
        actual: WireType,
        /// Wire type the declaration requires
        expected: WireType,
    },

    /// Binary decoding nested deeper than the configured limit
    #[error("message nesting exceeds the recursion limit of {limit}")]
    RecursionLimitExceeded {
        /// The configured limit
        limit: usize,
    },

    /// A strict encode or decode found required fields that are not set
    #[error("message is missing required fields")]
    MissingRequiredFields,

    /// Text input named a field the message does not declare
    #[error("unknown field '{name}' on line {line}")]
    UnknownField {
        /// Field name, number or bracketed extension name as written
        name: String,
        /// 1-based line of the field name
        line: usize,
    },

    /// Text input violates the grammar
    #[error("malformed text at {line}:{column}: {details}")]
    MalformedText {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// Text decoding nested deeper than the configured limit
    #[error("text message nesting exceeds the depth limit of {limit}")]
    MessageDepthLimit {
        /// The configured limit
        limit: usize,
    },

    /// An Any payload names a type the registry does not know
    #[error("no message type registered for '{type_url}'")]
    AnyTypeNotRegistered {
        /// The type URL that failed to resolve
        type_url: String,
    },

    /// An Any payload was unpacked as the wrong concrete type
    #[error("Any holds '{actual}', not '{expected}'")]
    AnyTypeMismatch {
        /// Requested message name
        expected: String,
        /// Message name carried by the Any
        actual: String,
    },
}

impl Error {
    /// Creates a new truncation error
    pub fn truncated(offset: usize) -> Self {
        Self::Truncated { offset }
    }

    /// Creates a new malformed-binary error
    pub fn malformed(offset: usize, details: impl Into<String>) -> Self {
        Self::Malformed {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new malformed-text error
    pub fn malformed_text(line: usize, column: usize, details: impl Into<String>) -> Self {
        Self::MalformedText {
            line,
            column,
            details: details.into(),
        }
    }

    /// Creates a new unknown-field error
    pub fn unknown_field(name: impl Into<String>, line: usize) -> Self {
        Self::UnknownField {
            name: name.into(),
            line,
        }
    }

    /// Creates a new unregistered-Any error
    pub fn any_not_registered(type_url: impl Into<String>) -> Self {
        Self::AnyTypeNotRegistered {
            type_url: type_url.into(),
        }
    }

    /// Returns true if the input simply ended too early
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// Returns true if the data was well-formed but incomplete or unexpected.
    ///
    /// Such errors can be retried in a more permissive mode (partial decoding,
    /// ignoring unknown fields, a larger depth limit or a populated registry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredFields
                | Self::UnknownField { .. }
                | Self::RecursionLimitExceeded { .. }
                | Self::MessageDepthLimit { .. }
                | Self::AnyTypeNotRegistered { .. }
        )
    }
}
