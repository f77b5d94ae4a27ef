//! Name-to-type table used to resolve `Any` payloads.
//!
//! ## Architecture
//!
//! A [`TypeRegistry`] is a cheap, cloneable handle to one shared table. Every
//! registration and lookup takes the same lock, so concurrent callers observe
//! a single linear history of registrations. The table is small and changes
//! rarely (startup, occasional dynamic registration), so one coarse lock is
//! enough.
//!
//! Entries are [`MessageInfo`] values: plain function pointers produced from a
//! generic instantiation per message type, which is how a registry that never
//! sees concrete types can still construct and decode them.

use crate::any::{AnyBox, AnyMessage};
use crate::error::Result;
use crate::message::NamedMessage;
use crate::text::{self, TextDecodeOptions};
use parking_lot::Mutex;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Type URL prefix used when none is given
pub const DEFAULT_TYPE_URL_PREFIX: &str = "type.googleapis.com";

/// Canonical type name of a type URL: everything after the final `/`.
///
/// A bare name without any `/` is returned unchanged.
pub fn type_name_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}

/// Joins a prefix and a type name into a type URL
pub fn build_type_url(prefix: &str, type_name: &str) -> String {
    if prefix.ends_with('/') {
        format!("{}{}", prefix, type_name)
    } else {
        format!("{}/{}", prefix, type_name)
    }
}

/// Construction and decoding entry points for one message type
#[derive(Clone, Copy)]
pub struct MessageInfo {
    name: &'static str,
    type_id: TypeId,
    new_fn: fn() -> AnyBox,
    binary_fn: fn(&[u8], bool) -> Result<AnyBox>,
    text_fn: fn(&str, &TextDecodeOptions) -> Result<AnyBox>,
}

fn new_boxed<M: NamedMessage>() -> AnyBox {
    AnyBox::new(M::default())
}

fn decode_boxed<M: NamedMessage>(bytes: &[u8], partial: bool) -> Result<AnyBox> {
    crate::required::deserialize::<M>(bytes, partial).map(AnyBox::new)
}

fn parse_boxed<M: NamedMessage>(input: &str, options: &TextDecodeOptions) -> Result<AnyBox> {
    let mut message = M::default();
    text::merge(&mut message, input, options)?;
    Ok(AnyBox::new(message))
}

impl MessageInfo {
    /// Entry points for `M`
    pub fn of<M: NamedMessage>() -> Self {
        Self {
            name: M::NAME,
            type_id: TypeId::of::<M>(),
            new_fn: new_boxed::<M>,
            binary_fn: decode_boxed::<M>,
            text_fn: parse_boxed::<M>,
        }
    }

    /// Fully-qualified message name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the concrete Rust type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// A default-valued instance
    pub fn new_instance(&self) -> AnyBox {
        (self.new_fn)()
    }

    /// Decodes binary input; unless `partial`, required fields must be set
    pub fn decode(&self, bytes: &[u8], partial: bool) -> Result<AnyBox> {
        (self.binary_fn)(bytes, partial)
    }

    /// Parses text-format input
    pub fn parse_text(&self, input: &str, options: &TextDecodeOptions) -> Result<AnyBox> {
        (self.text_fn)(input, options)
    }
}

impl fmt::Debug for MessageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageInfo")
            .field("name", &self.name)
            .field("type_id", &self.type_id)
            .finish()
    }
}

/// Shared table of known message types
#[derive(Clone, Default)]
pub struct TypeRegistry {
    inner: Arc<Mutex<HashMap<String, MessageInfo>>>,
}

impl TypeRegistry {
    /// Creates a registry that already knows `google.protobuf.Any`
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register::<AnyMessage>();
        registry
    }

    /// Creates a registry with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with `catalog` on top of [`new`](Self::new).
    ///
    /// The catalog normally holds the well-known types supplied by the schema
    /// layer. Conflicting entries are skipped.
    pub fn with_catalog(catalog: impl IntoIterator<Item = MessageInfo>) -> Self {
        let registry = Self::new();
        for info in catalog {
            registry.register_info(info);
        }
        registry
    }

    /// Registers `M` under its full name; see [`register_info`](Self::register_info)
    pub fn register<M: NamedMessage>(&self) -> bool {
        self.register_info(MessageInfo::of::<M>())
    }

    /// Registers an entry.
    ///
    /// Returns true if the name was free or already mapped to the same Rust
    /// type. Returns false, leaving the table unchanged, if the name belongs
    /// to a different type.
    pub fn register_info(&self, info: MessageInfo) -> bool {
        let mut table = self.inner.lock();
        match table.get(info.name) {
            Some(existing) if existing.type_id == info.type_id => true,
            Some(_) => {
                debug!(name = info.name, "rejected conflicting registration");
                false
            }
            None => {
                debug!(name = info.name, "registered message type");
                table.insert(info.name.to_string(), info);
                true
            }
        }
    }

    /// Finds the entry for a type name or type URL
    pub fn lookup(&self, name_or_url: &str) -> Option<MessageInfo> {
        self.inner
            .lock()
            .get(type_name_from_url(name_or_url))
            .copied()
    }

    /// Whether a type name or type URL is registered
    pub fn is_registered(&self, name_or_url: &str) -> bool {
        self.inner
            .lock()
            .contains_key(type_name_from_url(name_or_url))
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the registry has no entries
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.inner.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("names", &self.names())
            .finish()
    }
}
