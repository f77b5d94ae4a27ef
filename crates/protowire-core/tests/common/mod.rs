//! Hand-written message types in the shape schema-generated code takes.

#![allow(dead_code)]

use protowire_core::message::{FieldValue, FieldVisitor, Message, NamedMessage};
use protowire_core::wire::{FieldTag, WireReader, WireType};
use protowire_core::{Result, TextParser, UnknownFieldSet};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

macro_rules! unknown_accessors {
    () => {
        fn unknown_fields(&self) -> &UnknownFieldSet {
            &self.unknown
        }

        fn unknown_fields_mut(&mut self) -> &mut UnknownFieldSet {
            &mut self.unknown
        }
    };
}

// ---------------------------------------------------------------------------
// TestSomeRequiredTypes
// ---------------------------------------------------------------------------

pub const NESTED_FOO: i32 = 1;
pub const NESTED_BAR: i32 = 2;

fn nested_enum_name(value: i32) -> Option<&'static str> {
    match value {
        NESTED_FOO => Some("FOO"),
        NESTED_BAR => Some("BAR"),
        _ => None,
    }
}

fn nested_enum_value(name: &str) -> Option<i32> {
    match name {
        "FOO" => Some(NESTED_FOO),
        "BAR" => Some(NESTED_BAR),
        _ => None,
    }
}

/// Six required scalar fields of different wire types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSomeRequiredTypes {
    pub required_int32: Option<i32>,
    pub required_float: Option<f32>,
    pub required_bool: Option<bool>,
    pub required_string: Option<String>,
    pub required_bytes: Option<Vec<u8>>,
    pub required_nested_enum: Option<i32>,
    pub unknown: UnknownFieldSet,
}

impl Hash for TestSomeRequiredTypes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.required_int32.hash(state);
        self.required_float.map(f32::to_bits).hash(state);
        self.required_bool.hash(state);
        self.required_string.hash(state);
        self.required_bytes.hash(state);
        self.required_nested_enum.hash(state);
        self.unknown.hash(state);
    }
}

impl Message for TestSomeRequiredTypes {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if let Some(x) = self.required_int32 {
            v.visit_field(1, "required_int32", FieldValue::Int32(x))?;
        }
        if let Some(x) = self.required_float {
            v.visit_field(2, "required_float", FieldValue::Float(x))?;
        }
        if let Some(x) = self.required_bool {
            v.visit_field(3, "required_bool", FieldValue::Bool(x))?;
        }
        if let Some(x) = &self.required_string {
            v.visit_field(4, "required_string", FieldValue::String(x))?;
        }
        if let Some(x) = &self.required_bytes {
            v.visit_field(5, "required_bytes", FieldValue::Bytes(x))?;
        }
        if let Some(x) = self.required_nested_enum {
            v.visit_field(
                6,
                "required_nested_enum",
                FieldValue::Enum {
                    value: x,
                    name: nested_enum_name(x),
                },
            )?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.required_int32 = Some(r.read_int32(tag)?),
            2 => self.required_float = Some(r.read_float(tag)?),
            3 => self.required_bool = Some(r.read_bool(tag)?),
            4 => self.required_string = Some(r.read_string(tag)?),
            5 => self.required_bytes = Some(r.read_bytes(tag)?),
            6 => self.required_nested_enum = Some(r.read_enum(tag)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "required_int32" => self.required_int32 = Some(p.read_int32()?),
            "required_float" => self.required_float = Some(p.read_float()?),
            "required_bool" => self.required_bool = Some(p.read_bool()?),
            "required_string" => self.required_string = Some(p.read_string()?),
            "required_bytes" => self.required_bytes = Some(p.read_bytes()?),
            "required_nested_enum" => {
                self.required_nested_enum = Some(p.read_enum(nested_enum_value)?)
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn required_fields_set(&self) -> bool {
        self.required_int32.is_some()
            && self.required_float.is_some()
            && self.required_bool.is_some()
            && self.required_string.is_some()
            && self.required_bytes.is_some()
            && self.required_nested_enum.is_some()
    }

    unknown_accessors!();
}

impl NamedMessage for TestSomeRequiredTypes {
    const NAME: &'static str = "protowire_test.TestSomeRequiredTypes";
}

// ---------------------------------------------------------------------------
// TestRequired
// ---------------------------------------------------------------------------

/// Three required int32 fields: a = 1, b = 3, c = 33
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TestRequired {
    pub a: Option<i32>,
    pub b: Option<i32>,
    pub c: Option<i32>,
    pub unknown: UnknownFieldSet,
}

impl TestRequired {
    pub fn complete() -> Self {
        Self {
            a: Some(1),
            b: Some(2),
            c: Some(3),
            ..Default::default()
        }
    }
}

impl Message for TestRequired {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if let Some(x) = self.a {
            v.visit_field(1, "a", FieldValue::Int32(x))?;
        }
        if let Some(x) = self.b {
            v.visit_field(3, "b", FieldValue::Int32(x))?;
        }
        if let Some(x) = self.c {
            v.visit_field(33, "c", FieldValue::Int32(x))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.a = Some(r.read_int32(tag)?),
            3 => self.b = Some(r.read_int32(tag)?),
            33 => self.c = Some(r.read_int32(tag)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "a" => self.a = Some(p.read_int32()?),
            "b" => self.b = Some(p.read_int32()?),
            "c" => self.c = Some(p.read_int32()?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn required_fields_set(&self) -> bool {
        self.a.is_some() && self.b.is_some() && self.c.is_some()
    }

    fn text_field_name(&self, number: u32) -> Option<&'static str> {
        match number {
            1 => Some("a"),
            3 => Some("b"),
            33 => Some("c"),
            _ => None,
        }
    }

    unknown_accessors!();
}

impl NamedMessage for TestRequired {
    const NAME: &'static str = "protowire_test.TestRequired";
}

// ---------------------------------------------------------------------------
// TestRequiredForeign
// ---------------------------------------------------------------------------

pub const SINGLE_EXTENSION: &str = "[protowire_test.single_required]";

/// Optional, repeated, map and extension fields holding `TestRequired`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TestRequiredForeign {
    pub optional_message: Option<TestRequired>,
    pub repeated_message: Vec<TestRequired>,
    pub dummy: Option<i32>,
    pub map_message: BTreeMap<i32, TestRequired>,
    /// Extension field 1000
    pub single_required: Option<TestRequired>,
    pub unknown: UnknownFieldSet,
}

impl Message for TestRequiredForeign {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if let Some(m) = &self.optional_message {
            v.visit_field(1, "optional_message", FieldValue::Message(m))?;
        }
        for m in &self.repeated_message {
            v.visit_field(2, "repeated_message", FieldValue::Message(m))?;
        }
        if let Some(x) = self.dummy {
            v.visit_field(3, "dummy", FieldValue::Int32(x))?;
        }
        for (k, m) in &self.map_message {
            v.visit_map_entry(4, "map_message", FieldValue::Int32(*k), FieldValue::Message(m))?;
        }
        if let Some(m) = &self.single_required {
            v.visit_field(1000, SINGLE_EXTENSION, FieldValue::Message(m))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => r.read_optional_message(tag, &mut self.optional_message)?,
            2 => {
                let mut m = TestRequired::default();
                r.read_message(tag, &mut m)?;
                self.repeated_message.push(m);
            }
            3 => self.dummy = Some(r.read_int32(tag)?),
            4 => {
                let (k, m) = r.read_map_entry(
                    tag,
                    |r, t| r.read_int32(t),
                    |r, t| {
                        let mut m = TestRequired::default();
                        r.read_message(t, &mut m)?;
                        Ok(m)
                    },
                )?;
                self.map_message.insert(k, m);
            }
            1000 => r.read_optional_message(tag, &mut self.single_required)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "optional_message" => {
                p.read_message(self.optional_message.get_or_insert_with(Default::default))?
            }
            "repeated_message" => p.read_repeated(&mut self.repeated_message, |p| {
                let mut m = TestRequired::default();
                p.read_message(&mut m)?;
                Ok(m)
            })?,
            "dummy" => self.dummy = Some(p.read_int32()?),
            "map_message" => {
                let (k, m) = p.read_map_entry(
                    |p| p.read_int32(),
                    |p| {
                        let mut m = TestRequired::default();
                        p.read_message(&mut m)?;
                        Ok(m)
                    },
                )?;
                self.map_message.insert(k, m);
            }
            SINGLE_EXTENSION => {
                p.read_message(self.single_required.get_or_insert_with(Default::default))?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    unknown_accessors!();
}

impl NamedMessage for TestRequiredForeign {
    const NAME: &'static str = "protowire_test.TestRequiredForeign";
}

// ---------------------------------------------------------------------------
// TestRequiredOneof / OneofContainer
// ---------------------------------------------------------------------------

/// Message with one required double
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRequired {
    pub required_double: Option<f64>,
    pub unknown: UnknownFieldSet,
}

impl Hash for NestedRequired {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.required_double.map(f64::to_bits).hash(state);
        self.unknown.hash(state);
    }
}

impl Message for NestedRequired {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if let Some(x) = self.required_double {
            v.visit_field(1, "required_double", FieldValue::Double(x))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.required_double = Some(r.read_double(tag)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "required_double" => self.required_double = Some(p.read_double()?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn required_fields_set(&self) -> bool {
        self.required_double.is_some()
    }

    unknown_accessors!();
}

impl NamedMessage for NestedRequired {
    const NAME: &'static str = "protowire_test.TestRequiredOneof.NestedMessage";
}

#[derive(Debug, Clone, PartialEq, Hash)]
pub enum Foo {
    Int(i32),
    Str(String),
    Message(NestedRequired),
}

/// A oneof whose message alternative has a required field
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct TestRequiredOneof {
    pub foo: Option<Foo>,
    pub unknown: UnknownFieldSet,
}

impl Message for TestRequiredOneof {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        match &self.foo {
            Some(Foo::Int(x)) => v.visit_field(1, "foo_int", FieldValue::Int32(*x))?,
            Some(Foo::Str(s)) => v.visit_field(2, "foo_string", FieldValue::String(s))?,
            Some(Foo::Message(m)) => v.visit_field(3, "foo_message", FieldValue::Message(m))?,
            None => {}
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.foo = Some(Foo::Int(r.read_int32(tag)?)),
            2 => self.foo = Some(Foo::Str(r.read_string(tag)?)),
            3 => {
                r.expect_wire_type(tag, WireType::LengthDelimited)?;
                let mut m = match self.foo.take() {
                    Some(Foo::Message(m)) => m,
                    _ => NestedRequired::default(),
                };
                r.read_message(tag, &mut m)?;
                self.foo = Some(Foo::Message(m));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "foo_int" => self.foo = Some(Foo::Int(p.read_int32()?)),
            "foo_string" => self.foo = Some(Foo::Str(p.read_string()?)),
            "foo_message" => {
                let mut m = NestedRequired::default();
                p.read_message(&mut m)?;
                self.foo = Some(Foo::Message(m));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    unknown_accessors!();
}

impl NamedMessage for TestRequiredOneof {
    const NAME: &'static str = "protowire_test.TestRequiredOneof";
}

/// Group body with one required field
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Option3 {
    pub a: Option<i32>,
    pub unknown: UnknownFieldSet,
}

impl Message for Option3 {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if let Some(x) = self.a {
            v.visit_field(5, "a", FieldValue::Int32(x))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            5 => self.a = Some(r.read_int32(tag)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "a" => self.a = Some(p.read_int32()?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn required_fields_set(&self) -> bool {
        self.a.is_some()
    }

    unknown_accessors!();
}

impl NamedMessage for Option3 {
    const NAME: &'static str = "protowire_test.OneOfContainer.Option3";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerOption {
    Option3(Option3),
    Option4(i32),
}

/// A oneof holding either a group (field 3) or an int (field 4)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OneOfContainer {
    pub option: Option<ContainerOption>,
    pub unknown: UnknownFieldSet,
}

impl Message for OneOfContainer {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        match &self.option {
            Some(ContainerOption::Option3(g)) => v.visit_field(3, "Option3", FieldValue::Group(g))?,
            Some(ContainerOption::Option4(x)) => v.visit_field(4, "option4", FieldValue::Int32(*x))?,
            None => {}
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match (tag.field_number(), tag.wire_type()) {
            (3, WireType::StartGroup) => {
                let mut g = match self.option.take() {
                    Some(ContainerOption::Option3(g)) => g,
                    _ => Option3::default(),
                };
                r.read_group(tag, &mut g)?;
                self.option = Some(ContainerOption::Option3(g));
            }
            (4, _) => self.option = Some(ContainerOption::Option4(r.read_int32(tag)?)),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "Option3" => {
                let mut g = Option3::default();
                p.read_group(&mut g)?;
                self.option = Some(ContainerOption::Option3(g));
            }
            "option4" => self.option = Some(ContainerOption::Option4(p.read_int32()?)),
            _ => return Ok(false),
        }
        Ok(true)
    }

    unknown_accessors!();
}

impl NamedMessage for OneOfContainer {
    const NAME: &'static str = "protowire_test.OneOfContainer";
}

// ---------------------------------------------------------------------------
// Scalars: one field of every kind, proto3 style (defaults are not emitted)
// ---------------------------------------------------------------------------

pub const COLOR_RED: i32 = 1;
pub const COLOR_GREEN: i32 = 2;

fn color_name(value: i32) -> Option<&'static str> {
    match value {
        0 => Some("COLOR_UNSPECIFIED"),
        COLOR_RED => Some("RED"),
        COLOR_GREEN => Some("GREEN"),
        _ => None,
    }
}

fn color_value(name: &str) -> Option<i32> {
    match name {
        "COLOR_UNSPECIFIED" => Some(0),
        "RED" => Some(COLOR_RED),
        "GREEN" => Some(COLOR_GREEN),
        _ => None,
    }
}

/// Small nested message
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Inner {
    pub value: i32,
    pub note: String,
    pub unknown: UnknownFieldSet,
}

impl Message for Inner {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if self.value != 0 {
            v.visit_field(1, "value", FieldValue::Int32(self.value))?;
        }
        if !self.note.is_empty() {
            v.visit_field(2, "note", FieldValue::String(&self.note))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.value = r.read_int32(tag)?,
            2 => self.note = r.read_string(tag)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "value" => self.value = p.read_int32()?,
            "note" => self.note = p.read_string()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn text_field_name(&self, number: u32) -> Option<&'static str> {
        match number {
            1 => Some("value"),
            2 => Some("note"),
            _ => None,
        }
    }

    unknown_accessors!();
}

impl NamedMessage for Inner {
    const NAME: &'static str = "protowire_test.Inner";
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scalars {
    pub int32: i32,
    pub int64: i64,
    pub uint32: u32,
    pub uint64: u64,
    pub sint32: i32,
    pub sint64: i64,
    pub fixed32: u32,
    pub fixed64: u64,
    pub sfixed32: i32,
    pub sfixed64: i64,
    pub float: f32,
    pub double: f64,
    pub flag: bool,
    pub text: String,
    pub data: Vec<u8>,
    pub packed: Vec<i32>,
    pub inner: Option<Inner>,
    pub color: i32,
    pub labels: BTreeMap<String, i32>,
    pub unknown: UnknownFieldSet,
}

impl Hash for Scalars {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.int32, self.int64, self.uint32, self.uint64).hash(state);
        (self.sint32, self.sint64, self.fixed32, self.fixed64).hash(state);
        (self.sfixed32, self.sfixed64).hash(state);
        (self.float.to_bits(), self.double.to_bits(), self.flag).hash(state);
        (&self.text, &self.data, &self.packed, &self.inner).hash(state);
        (self.color, &self.labels, &self.unknown).hash(state);
    }
}

impl Message for Scalars {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if self.int32 != 0 {
            v.visit_field(1, "int32", FieldValue::Int32(self.int32))?;
        }
        if self.int64 != 0 {
            v.visit_field(2, "int64", FieldValue::Int64(self.int64))?;
        }
        if self.uint32 != 0 {
            v.visit_field(3, "uint32", FieldValue::UInt32(self.uint32))?;
        }
        if self.uint64 != 0 {
            v.visit_field(4, "uint64", FieldValue::UInt64(self.uint64))?;
        }
        if self.sint32 != 0 {
            v.visit_field(5, "sint32", FieldValue::SInt32(self.sint32))?;
        }
        if self.sint64 != 0 {
            v.visit_field(6, "sint64", FieldValue::SInt64(self.sint64))?;
        }
        if self.fixed32 != 0 {
            v.visit_field(7, "fixed32", FieldValue::Fixed32(self.fixed32))?;
        }
        if self.fixed64 != 0 {
            v.visit_field(8, "fixed64", FieldValue::Fixed64(self.fixed64))?;
        }
        if self.sfixed32 != 0 {
            v.visit_field(9, "sfixed32", FieldValue::SFixed32(self.sfixed32))?;
        }
        if self.sfixed64 != 0 {
            v.visit_field(10, "sfixed64", FieldValue::SFixed64(self.sfixed64))?;
        }
        if self.float.to_bits() != 0 {
            v.visit_field(11, "float", FieldValue::Float(self.float))?;
        }
        if self.double.to_bits() != 0 {
            v.visit_field(12, "double", FieldValue::Double(self.double))?;
        }
        if self.flag {
            v.visit_field(13, "flag", FieldValue::Bool(self.flag))?;
        }
        if !self.text.is_empty() {
            v.visit_field(14, "text", FieldValue::String(&self.text))?;
        }
        if !self.data.is_empty() {
            v.visit_field(15, "data", FieldValue::Bytes(&self.data))?;
        }
        if !self.packed.is_empty() {
            let values: Vec<_> = self.packed.iter().map(|&x| FieldValue::Int32(x)).collect();
            v.visit_packed(16, "packed", &values)?;
        }
        if let Some(inner) = &self.inner {
            v.visit_field(17, "inner", FieldValue::Message(inner))?;
        }
        if self.color != 0 {
            v.visit_field(
                18,
                "color",
                FieldValue::Enum {
                    value: self.color,
                    name: color_name(self.color),
                },
            )?;
        }
        for (k, x) in &self.labels {
            v.visit_map_entry(19, "labels", FieldValue::String(k), FieldValue::Int32(*x))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.int32 = r.read_int32(tag)?,
            2 => self.int64 = r.read_int64(tag)?,
            3 => self.uint32 = r.read_uint32(tag)?,
            4 => self.uint64 = r.read_uint64(tag)?,
            5 => self.sint32 = r.read_sint32(tag)?,
            6 => self.sint64 = r.read_sint64(tag)?,
            7 => self.fixed32 = r.read_fixed32(tag)?,
            8 => self.fixed64 = r.read_fixed64(tag)?,
            9 => self.sfixed32 = r.read_sfixed32(tag)?,
            10 => self.sfixed64 = r.read_sfixed64(tag)?,
            11 => self.float = r.read_float(tag)?,
            12 => self.double = r.read_double(tag)?,
            13 => self.flag = r.read_bool(tag)?,
            14 => self.text = r.read_string(tag)?,
            15 => self.data = r.read_bytes(tag)?,
            16 => r.read_repeated(tag, WireType::Varint, &mut self.packed, |r, t| r.read_int32(t))?,
            17 => r.read_optional_message(tag, &mut self.inner)?,
            18 => self.color = r.read_enum(tag)?,
            19 => {
                let (k, x) =
                    r.read_map_entry(tag, |r, t| r.read_string(t), |r, t| r.read_int32(t))?;
                self.labels.insert(k, x);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "int32" => self.int32 = p.read_int32()?,
            "int64" => self.int64 = p.read_int64()?,
            "uint32" => self.uint32 = p.read_uint32()?,
            "uint64" => self.uint64 = p.read_uint64()?,
            "sint32" => self.sint32 = p.read_int32()?,
            "sint64" => self.sint64 = p.read_int64()?,
            "fixed32" => self.fixed32 = p.read_uint32()?,
            "fixed64" => self.fixed64 = p.read_uint64()?,
            "sfixed32" => self.sfixed32 = p.read_int32()?,
            "sfixed64" => self.sfixed64 = p.read_int64()?,
            "float" => self.float = p.read_float()?,
            "double" => self.double = p.read_double()?,
            "flag" => self.flag = p.read_bool()?,
            "text" => self.text = p.read_string()?,
            "data" => self.data = p.read_bytes()?,
            "packed" => p.read_repeated(&mut self.packed, |p| p.read_int32())?,
            "inner" => p.read_message(self.inner.get_or_insert_with(Default::default))?,
            "color" => self.color = p.read_enum(color_value)?,
            "labels" => {
                let (k, x) = p.read_map_entry(|p| p.read_string(), |p| p.read_int32())?;
                self.labels.insert(k, x);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn text_field_name(&self, number: u32) -> Option<&'static str> {
        match number {
            1 => Some("int32"),
            2 => Some("int64"),
            3 => Some("uint32"),
            4 => Some("uint64"),
            5 => Some("sint32"),
            6 => Some("sint64"),
            7 => Some("fixed32"),
            8 => Some("fixed64"),
            9 => Some("sfixed32"),
            10 => Some("sfixed64"),
            11 => Some("float"),
            12 => Some("double"),
            13 => Some("flag"),
            14 => Some("text"),
            15 => Some("data"),
            16 => Some("packed"),
            17 => Some("inner"),
            18 => Some("color"),
            19 => Some("labels"),
            _ => None,
        }
    }

    unknown_accessors!();
}

impl NamedMessage for Scalars {
    const NAME: &'static str = "protowire_test.Scalars";
}

// ---------------------------------------------------------------------------
// Duration: stands in for a well-known type supplied by the schema layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Duration {
    pub seconds: i64,
    pub nanos: i32,
    pub unknown: UnknownFieldSet,
}

impl Message for Duration {
    fn full_name(&self) -> &'static str {
        Self::NAME
    }

    fn traverse(&self, v: &mut dyn FieldVisitor) -> Result<()> {
        if self.seconds != 0 {
            v.visit_field(1, "seconds", FieldValue::Int64(self.seconds))?;
        }
        if self.nanos != 0 {
            v.visit_field(2, "nanos", FieldValue::Int32(self.nanos))?;
        }
        v.visit_unknown(&self.unknown)
    }

    fn merge_field(&mut self, tag: FieldTag, r: &mut WireReader<'_>) -> Result<bool> {
        match tag.field_number() {
            1 => self.seconds = r.read_int64(tag)?,
            2 => self.nanos = r.read_int32(tag)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn merge_text_field(&mut self, name: &str, p: &mut TextParser<'_>) -> Result<bool> {
        match name {
            "seconds" => self.seconds = p.read_int64()?,
            "nanos" => self.nanos = p.read_int32()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn text_field_name(&self, number: u32) -> Option<&'static str> {
        match number {
            1 => Some("seconds"),
            2 => Some("nanos"),
            _ => None,
        }
    }

    unknown_accessors!();
}

impl NamedMessage for Duration {
    const NAME: &'static str = "google.protobuf.Duration";
}
