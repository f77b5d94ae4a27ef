//! `google.protobuf.Any`: a message of arbitrary type tagged with its type URL.
//!
//! The payload stays as raw bytes until someone needs the concrete message.
//! [`AnyMessage::resolve`] materializes it through a [`TypeRegistry`];
//! [`AnyMessage::unpack`] decodes it as a statically known type. A message
//! packed with [`AnyMessage::pack`] is kept as-is and only serialized when
//! its bytes are asked for.

pub mod boxed;

pub use boxed::AnyBox;

use crate::binary;
use crate::error::{Error, Result};
use crate::message::{FieldValue, FieldVisitor, Message, NamedMessage};
use crate::registry::{build_type_url, type_name_from_url, TypeRegistry, DEFAULT_TYPE_URL_PREFIX};
use crate::required;
use crate::text::TextParser;
use crate::unknown::UnknownFieldSet;
use crate::wire::{FieldTag, WireReader};
use bytes::Bytes;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
enum Payload {
    Serialized(Bytes),
    Message(AnyBox),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Serialized(Bytes::new())
    }
}

/// The `google.protobuf.Any` container
#[derive(Debug, Clone, Default)]
pub struct AnyMessage {
    type_url: String,
    payload: Payload,
    unknown: UnknownFieldSet,
}

impl AnyMessage {
    /// Packs `message` under the default type URL prefix
    pub fn pack<M: NamedMessage>(message: &M) -> Self {
        Self::pack_with_prefix(message, DEFAULT_TYPE_URL_PREFIX)
    }

    /// Packs `message` under a custom type URL prefix
    pub fn pack_with_prefix<M: NamedMessage>(message: &M, prefix: &str) -> Self {
        Self {
            type_url: build_type_url(prefix, M::NAME),
            payload: Payload::Message(AnyBox::new(message.clone())),
            unknown: UnknownFieldSet::default(),
        }
    }

    /// Builds an Any from a type URL and already-serialized payload bytes
    pub fn from_parts(type_url: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            type_url: type_url.into(),
            payload: Payload::Serialized(value.into()),
            unknown: UnknownFieldSet::default(),
        }
    }

    /// The full type URL
    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// The canonical type name (text after the final `/`)
    pub fn type_name(&self) -> &str {
        type_name_from_url(&self.type_url)
    }

    /// Whether the payload claims to be an `M`
    pub fn is<M: NamedMessage>(&self) -> bool {
        self.type_name() == M::NAME
    }

    /// The resolved payload, if it has been materialized
    pub fn message(&self) -> Option<&dyn Message> {
        match &self.payload {
            Payload::Message(boxed) => Some(boxed.message()),
            Payload::Serialized(_) => None,
        }
    }

    /// Serialized payload bytes.
    ///
    /// A resolved payload is encoded on demand without the required-field check.
    pub fn value(&self) -> Result<Bytes> {
        match &self.payload {
            Payload::Serialized(bytes) => Ok(bytes.clone()),
            Payload::Message(boxed) => binary::encode(boxed.message()).map(Bytes::from),
        }
    }

    /// Extracts the payload as `M`.
    ///
    /// Fails with [`Error::AnyTypeMismatch`] if the type URL names another
    /// type. Unless `partial`, the result must have its required fields set.
    pub fn unpack<M: NamedMessage>(&self, partial: bool) -> Result<M> {
        if !self.is::<M>() {
            return Err(Error::AnyTypeMismatch {
                expected: M::NAME.to_string(),
                actual: self.type_name().to_string(),
            });
        }
        match &self.payload {
            Payload::Message(boxed) => match boxed.downcast_ref::<M>() {
                Some(message) => {
                    if !partial && !required::is_initialized(message) {
                        return Err(Error::MissingRequiredFields);
                    }
                    Ok(message.clone())
                }
                None => required::deserialize(&self.value()?, partial),
            },
            Payload::Serialized(bytes) => required::deserialize(bytes, partial),
        }
    }

    /// Materializes a serialized payload through `registry`.
    ///
    /// Returns `Ok(false)` if the type is not registered; the payload is left
    /// untouched in that case.
    pub fn resolve(&mut self, registry: &TypeRegistry) -> Result<bool> {
        let Payload::Serialized(bytes) = &self.payload else {
            return Ok(true);
        };
        let Some(info) = registry.lookup(&self.type_url) else {
            debug!(type_url = %self.type_url, "Any payload type is not registered");
            return Ok(false);
        };
        let boxed = info.decode(bytes, true)?;
        trace!(type_url = %self.type_url, "resolved Any payload");
        self.payload = Payload::Message(boxed);
        Ok(true)
    }

    pub(crate) fn set_message(&mut self, type_url: String, message: AnyBox) {
        self.type_url = type_url;
        self.payload = Payload::Message(message);
    }

    /// The payload as a message for expanded text output, resolving through
    /// `registry` without modifying `self`. `None` means print the raw fields.
    pub(crate) fn expanded(&self, registry: Option<&TypeRegistry>) -> Option<Cow<'_, AnyBox>> {
        match &self.payload {
            Payload::Message(boxed) => Some(Cow::Borrowed(boxed)),
            Payload::Serialized(bytes) => {
                let info = registry?.lookup(&self.type_url)?;
                match info.decode(bytes, true) {
                    Ok(boxed) => Some(Cow::Owned(boxed)),
                    Err(err) => {
                        debug!(type_url = %self.type_url, error = %err, "cannot expand Any payload");
                        None
                    }
                }
            }
        }
    }
}

impl PartialEq for AnyMessage {
    fn eq(&self, other: &Self) -> bool {
        if self.type_url != other.type_url || self.unknown != other.unknown {
            return false;
        }
        match (&self.payload, &other.payload) {
            (Payload::Message(a), Payload::Message(b)) if a.is_equal(b).is_some() => a == b,
            _ => match (self.value(), other.value()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Hash for AnyMessage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_url.hash(state);
        // Hash the serialized form so a resolved payload and its raw bytes agree.
        self.value().unwrap_or_default().hash(state);
        self.unknown.hash(state);
    }
}

impl Message for AnyMessage {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, visitor: &mut dyn FieldVisitor) -> Result<()> {
        if !self.type_url.is_empty() {
            visitor.visit_field(1, "type_url", FieldValue::String(&self.type_url))?;
        }
        let value = self.value()?;
        if !value.is_empty() {
            visitor.visit_field(2, "value", FieldValue::Bytes(&value))?;
        }
        visitor.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, reader: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.type_url = reader.read_string(tag)?,
            2 => {
                let bytes = reader.read_bytes_ref(tag)?;
                self.payload = Payload::Serialized(Bytes::copy_from_slice(bytes));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, parser: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "type_url" => self.type_url = parser.read_string()?,
            "value" => self.payload = Payload::Serialized(Bytes::from(parser.read_bytes()?)),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn text_field_name(&self, number: u32) -> Option<&'static str> {
        match number {
            1 => Some("type_url"),
            2 => Some("value"),
            _ => None,
        }
    }

    /// A resolved payload must itself be initialized; raw bytes are taken on trust.
    fn required_fields_set(&self) -> bool {
        match &self.payload {
            Payload::Message(boxed) => required::is_initialized(boxed.message()),
            Payload::Serialized(_) => true,
        }
    }

    fn unknown_fields(&self) -> &UnknownFieldSet {
        &self.unknown
    }

    fn unknown_fields_mut(&mut self) -> &mut UnknownFieldSet {
        &mut self.unknown
    }
}

impl NamedMessage for AnyMessage {
    const NAME: &'static str = "google.protobuf.Any";
}
