//! Protobuf text format.
//!
//! ## Output
//!
//! ```text
//! name: "example"
//! id: 42
//! child {
//!   flag: true
//! }
//! 7: 0x0000002a
//! ```
//!
//! Known fields print by name, unknown fields by number. Nested messages and
//! groups use `{ ... }` blocks with two-space indentation.
//!
//! ## Limits
//!
//! Three independent bounds apply:
//!
//! - [`TextEncodeOptions::unknown_depth_cap`] limits how many levels of
//!   length-delimited unknown fields the printer will try to show as nested
//!   messages before falling back to quoted strings.
//! - [`TextEncodeOptions::any_expansion_depth`] stops expanding `Any`
//!   payloads past that block depth; deeper ones print as raw fields.
//! - [`TextDecodeOptions::message_depth_limit`] limits `{ ... }` nesting while
//!   parsing, for known and skipped unknown fields alike.

pub mod parser;
pub mod printer;
pub(crate) mod scanner;

pub use parser::TextParser;

use crate::error::{Error, Result};
use crate::message::Message;
use crate::registry::TypeRegistry;
use crate::required;

/// Default cap on nested rendering of unknown length-delimited fields
pub const DEFAULT_UNKNOWN_DEPTH_CAP: usize = 10;

/// Default nesting limit for text parsing
pub const DEFAULT_MESSAGE_DEPTH_LIMIT: usize = 10;

/// Options for text output
#[derive(Debug, Clone)]
pub struct TextEncodeOptions {
    /// Print unknown fields by number
    pub print_unknown_fields: bool,
    /// Levels of unknown length-delimited fields shown as nested messages
    pub unknown_depth_cap: usize,
    /// Deepest block nesting at which an `Any` payload is still expanded
    pub any_expansion_depth: usize,
    /// Registry used to expand `Any` payloads
    pub registry: Option<TypeRegistry>,
}

impl Default for TextEncodeOptions {
    fn default() -> Self {
        Self {
            print_unknown_fields: true,
            unknown_depth_cap: DEFAULT_UNKNOWN_DEPTH_CAP,
            any_expansion_depth: DEFAULT_MESSAGE_DEPTH_LIMIT,
            registry: None,
        }
    }
}

impl TextEncodeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable unknown-field output
    pub fn print_unknown_fields(mut self, print: bool) -> Self {
        self.print_unknown_fields = print;
        self
    }

    /// Set the unknown-field nesting cap
    pub fn unknown_depth_cap(mut self, cap: usize) -> Self {
        self.unknown_depth_cap = cap;
        self
    }

    /// Set how deep `Any` payloads may be expanded
    pub fn any_expansion_depth(mut self, depth: usize) -> Self {
        self.any_expansion_depth = depth;
        self
    }

    /// Expand `Any` payloads through `registry`
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Options for text parsing
#[derive(Debug, Clone)]
pub struct TextDecodeOptions {
    /// Skip fields the schema does not declare instead of failing
    pub ignore_unknown_fields: bool,
    /// Skip unknown `[bracketed]` extension names instead of failing
    pub ignore_unknown_extension_fields: bool,
    /// Maximum `{ ... }` nesting
    pub message_depth_limit: usize,
    /// Skip the required-field check after parsing
    pub partial: bool,
    /// Registry used to parse expanded `Any` payloads
    pub registry: Option<TypeRegistry>,
}

impl Default for TextDecodeOptions {
    fn default() -> Self {
        Self {
            ignore_unknown_fields: false,
            ignore_unknown_extension_fields: false,
            message_depth_limit: DEFAULT_MESSAGE_DEPTH_LIMIT,
            partial: false,
            registry: None,
        }
    }
}

impl TextDecodeOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip unknown field names and numbers
    pub fn ignore_unknown_fields(mut self, ignore: bool) -> Self {
        self.ignore_unknown_fields = ignore;
        self
    }

    /// Skip unknown extension names
    pub fn ignore_unknown_extension_fields(mut self, ignore: bool) -> Self {
        self.ignore_unknown_extension_fields = ignore;
        self
    }

    /// Set the nesting limit
    pub fn message_depth_limit(mut self, limit: usize) -> Self {
        self.message_depth_limit = limit;
        self
    }

    /// Accept messages with missing required fields
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Resolve expanded `Any` payloads through `registry`
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }
}

/// Renders `message` as text
pub fn print(message: &dyn Message, options: &TextEncodeOptions) -> Result<String> {
    printer::TextPrinter::new(options).print(message)
}

/// Parses `input` into `message`; unless `options.partial`, required fields must end up set
pub fn merge(message: &mut dyn Message, input: &str, options: &TextDecodeOptions) -> Result<()> {
    TextParser::new(input, options).parse_into(message)?;
    if !options.partial && !required::is_initialized(message) {
        return Err(Error::MissingRequiredFields);
    }
    Ok(())
}
