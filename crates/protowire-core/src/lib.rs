//! # protowire-core
//!
//! The wire-format runtime of a Protocol Buffers implementation.
//!
//! This crate provides:
//! - Binary encoding and decoding with byte-exact unknown-field preservation
//! - Text format printing and parsing with bounded nesting
//! - A shared type registry for resolving `google.protobuf.Any` payloads
//! - Required-field checks gating strict versus partial (de)serialization
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`wire`]: Varints, tags and the binary reader/writer cursors
//! - [`message`]: The traits generated message types implement
//! - [`binary`]: Size pass, encoder and decode loop
//! - [`text`]: Text format printer, scanner and parser
//! - [`registry`]: Name-to-type table for `Any` resolution
//! - [`any`]: The `Any` container and type-erased message boxes
//! - [`required`]: Initialization checks
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use protowire_core::{EmptyMessage, MessageExt, NamedMessage};
//!
//! // A schema-less view keeps every field as unknown data
//! let message = EmptyMessage::decode(&[8, 150, 1, 18, 3, b'a', b'b', b'c'])?;
//! assert_eq!(message.to_text()?, "1: 150\n2: \"abc\"\n");
//!
//! // Re-encoding reproduces the input exactly
//! assert_eq!(message.encode_to_vec()?, [8, 150, 1, 18, 3, b'a', b'b', b'c']);
//! # Ok::<(), protowire_core::Error>(())
//! ```
//!
//! ## Extensibility
//!
//! Generated code plugs in through two traits:
//!
//! - [`Message`]: Field traversal and per-field merge callbacks
//! - [`FieldVisitor`]: Receives fields during traversal; implement it to add
//!   another output format
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod any;
pub mod binary;
pub mod error;
pub mod message;
pub mod registry;
pub mod required;
pub mod text;
pub mod unknown;
pub mod wire;

// Re-export primary types for convenience
pub use any::{AnyBox, AnyMessage};
pub use binary::DecodeOptions;
pub use error::{Error, Result};
pub use message::{EmptyMessage, FieldValue, FieldVisitor, Message, MessageExt, NamedMessage};
pub use registry::{MessageInfo, TypeRegistry};
pub use text::{TextDecodeOptions, TextEncodeOptions, TextParser};
pub use unknown::{UnknownField, UnknownFieldSet};
pub use wire::{FieldTag, WireReader, WireType, WireWriter, MAX_FIELD_NUMBER};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
