//! Required-field completeness checks.
//!
//! A message is initialized when its own required fields are set and every
//! nested message it actually holds is initialized too. Strict encoding and
//! decoding refuse incomplete messages; partial mode skips the check.

use crate::binary::{self, DecodeOptions};
use crate::error::{Error, Result};
use crate::message::{FieldValue, FieldVisitor, Message, NamedMessage};
use crate::unknown::UnknownFieldSet;

struct InitializationVisitor {
    complete: bool,
}

impl InitializationVisitor {
    fn check(&mut self, value: &FieldValue<'_>) {
        if !self.complete {
            return;
        }
        if let FieldValue::Message(m) | FieldValue::Group(m) = value {
            self.complete = is_initialized(*m);
        }
    }
}

impl FieldVisitor for InitializationVisitor {
    fn visit_field(&mut self, _number: u32, _name: &'static str, value: FieldValue<'_>) -> Result<()> {
        self.check(&value);
        Ok(())
    }

    fn visit_packed(&mut self, _number: u32, _name: &'static str, _values: &[FieldValue<'_>]) -> Result<()> {
        Ok(())
    }

    fn visit_map_entry(
        &mut self,
        _number: u32,
        _name: &'static str,
        _key: FieldValue<'_>,
        value: FieldValue<'_>,
    ) -> Result<()> {
        self.check(&value);
        Ok(())
    }

    fn visit_unknown(&mut self, _unknown: &UnknownFieldSet) -> Result<()> {
        Ok(())
    }
}

/// Whether `message` and every nested message it holds have their required fields set
pub fn is_initialized(message: &dyn Message) -> bool {
    if !message.required_fields_set() {
        return false;
    }
    let mut visitor = InitializationVisitor { complete: true };
    // A traversal error means the message could not be walked, so it cannot be
    // vouched for either.
    message.traverse(&mut visitor).is_ok() && visitor.complete
}

/// Encodes `message`; unless `partial`, fails without output if it is incomplete
pub fn serialize(message: &dyn Message, partial: bool) -> Result<Vec<u8>> {
    if !partial && !is_initialized(message) {
        return Err(Error::MissingRequiredFields);
    }
    binary::encode(message)
}

/// Decodes a whole message; unless `partial`, fails if it is incomplete
pub fn deserialize<M: NamedMessage>(bytes: &[u8], partial: bool) -> Result<M> {
    deserialize_with_options(bytes, &DecodeOptions::new().partial(partial))
}

/// Decodes a whole message with explicit options.
///
/// The input is always parsed to the end before the required-field check, so
/// malformed data is reported as such even when fields are also missing.
pub fn deserialize_with_options<M: NamedMessage>(bytes: &[u8], options: &DecodeOptions) -> Result<M> {
    let mut message = M::default();
    binary::merge(&mut message, bytes, options)?;
    if !options.partial && !is_initialized(&message) {
        return Err(Error::MissingRequiredFields);
    }
    Ok(message)
}
