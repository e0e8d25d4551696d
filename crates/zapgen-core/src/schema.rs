//! Intermediate representation for message schemas.
//!
//! This module defines the IR consumed by the generation engine. It is a
//! simplified, wire-independent view of protobuf descriptors: only what
//! matters for logging a value survives.
//!
//! # Structure
//!
//! - [`SchemaFile`]: one `.proto` file with its top-level declarations
//! - [`MessageType`]: a message with ordered fields and nested declarations
//! - [`Field`]: a field with its logical kind and cardinality
//! - [`FieldKind`]: logical value kind (wire sub-variants collapsed)
//!
//! # Loading
//!
//! The IR is normally built from protoc descriptors by the plugin driver, but
//! it also (de)serializes directly, so a schema can be described in JSON or
//! TOML:
//!
//! ```toml
//! [[files]]
//! name = "user.proto"
//! package = "acme"
//!
//! [[files.messages]]
//! name = "User"
//! fields = [
//!     { name = "id", number = 1, kind = "int32" },
//!     { name = "tags", number = 2, kind = "string", cardinality = "repeated" },
//! ]
//! ```
//!
//! Wire-level kind names (`sint32`, `fixed64`, `group`, ...) are accepted as
//! aliases and collapse to their logical kind.

use crate::error::GenResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical kind of a field value.
///
/// Logging cares about the logical value, not its wire representation, so
/// zig-zag and fixed-width integer encodings collapse into the plain integer
/// kinds and groups collapse into messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Bool,
    #[serde(alias = "sint32", alias = "sfixed32")]
    Int32,
    #[serde(alias = "fixed32")]
    Uint32,
    #[serde(alias = "sint64", alias = "sfixed64")]
    Int64,
    #[serde(alias = "fixed64")]
    Uint64,
    Float,
    Double,
    String,
    Bytes,
    Enum,
    #[serde(alias = "group")]
    Message,
}

impl FieldKind {
    /// Every kind, in declaration order.
    pub const ALL: [FieldKind; 11] = [
        FieldKind::Bool,
        FieldKind::Int32,
        FieldKind::Uint32,
        FieldKind::Int64,
        FieldKind::Uint64,
        FieldKind::Float,
        FieldKind::Double,
        FieldKind::String,
        FieldKind::Bytes,
        FieldKind::Enum,
        FieldKind::Message,
    ];

    /// Whether values of this kind need a type reference to be resolved.
    pub fn is_reference(self) -> bool {
        matches!(self, FieldKind::Enum | FieldKind::Message)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Int32 => "int32",
            FieldKind::Uint32 => "uint32",
            FieldKind::Int64 => "int64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Float => "float",
            FieldKind::Double => "double",
            FieldKind::String => "string",
            FieldKind::Bytes => "bytes",
            FieldKind::Enum => "enum",
            FieldKind::Message => "message",
        };
        f.write_str(name)
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly one value.
    #[default]
    Singular,
    /// An ordered sequence.
    Repeated,
    /// A key/value mapping, described by a synthetic entry type.
    Map,
}

/// A field in a message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as declared in the schema (snake_case).
    pub name: String,

    /// Declared field number. Documentation only.
    #[serde(default)]
    pub number: i32,

    /// Logical value kind. For map fields this is `Message` (the entry type).
    pub kind: FieldKind,

    #[serde(default)]
    pub cardinality: Cardinality,

    /// Referenced enum, message, or map entry type.
    ///
    /// Fully-qualified names start with `.`; anything else is resolved
    /// relative to the declaring file's package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    /// Weak fields have no guaranteed type linkage and are never logged.
    #[serde(default, skip_serializing_if = "is_false")]
    pub weak: bool,

    /// Name of the (non-synthetic) oneof this field belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oneof: Option<String>,

    /// Explicit presence (proto2 optional scalars, proto3 `optional`).
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Field {
    /// Create a singular field of a non-reference kind.
    pub fn scalar(name: impl Into<String>, number: i32, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            number,
            kind,
            cardinality: Cardinality::Singular,
            type_name: None,
            weak: false,
            oneof: None,
            optional: false,
        }
    }

    /// Create a singular message-typed field.
    pub fn message(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::scalar(name, number, FieldKind::Message)
        }
    }

    /// Create a singular enum-typed field.
    pub fn enumeration(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Self::scalar(name, number, FieldKind::Enum)
        }
    }

    /// Create a map field referencing its synthetic entry type.
    pub fn map(name: impl Into<String>, number: i32, entry_type: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::Map,
            ..Self::message(name, number, entry_type)
        }
    }

    /// Mark the field as repeated.
    pub fn repeated(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }

    /// Mark the field as weak.
    pub fn weak(mut self) -> Self {
        self.weak = true;
        self
    }

    /// Place the field in a oneof.
    pub fn in_oneof(mut self, oneof: impl Into<String>) -> Self {
        self.oneof = Some(oneof.into());
        self
    }

    /// Give the field explicit presence.
    pub fn with_presence(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// An enum declaration. Only its name matters for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A message type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageType {
    /// Simple (unqualified) message name.
    pub name: String,

    /// Fields in declaration order. Order is preserved in generated output.
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Nested message declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<MessageType>,

    /// Nested enum declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumType>,

    /// Synthetic key/value type backing a map field.
    #[serde(default, skip_serializing_if = "is_false")]
    pub map_entry: bool,
}

impl MessageType {
    /// Create an empty message type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            nested: Vec::new(),
            enums: Vec::new(),
            map_entry: false,
        }
    }

    /// Create a synthetic map entry type with `key` (1) and `value` (2).
    pub fn map_entry(name: impl Into<String>, key: FieldKind, value: Field) -> Self {
        let value = Field {
            name: "value".to_string(),
            number: 2,
            ..value
        };
        Self {
            fields: vec![Field::scalar("key", 1, key), value],
            map_entry: true,
            ..Self::new(name)
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_nested(mut self, nested: MessageType) -> Self {
        self.nested.push(nested);
        self
    }

    pub fn with_enum(mut self, decl: EnumType) -> Self {
        self.enums.push(decl);
        self
    }
}

/// A schema file: the unit of generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Proto path of the file (e.g. `acme/user.proto`).
    pub name: String,

    /// Proto package, without leading dot. May be empty.
    #[serde(default)]
    pub package: String,

    /// Value of the `go_package` option, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_package: Option<String>,

    #[serde(default)]
    pub messages: Vec<MessageType>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumType>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
}

impl SchemaFile {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            go_package: None,
            messages: Vec::new(),
            enums: Vec::new(),
            deprecated: false,
        }
    }

    pub fn with_message(mut self, message: MessageType) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_enum(mut self, decl: EnumType) -> Self {
        self.enums.push(decl);
        self
    }

    /// Fully-qualified name prefix for top-level declarations (`.pkg`).
    pub fn scope(&self) -> String {
        if self.package.is_empty() {
            String::new()
        } else {
            format!(".{}", self.package)
        }
    }
}

/// A set of schema files loaded from a JSON or TOML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaBundle {
    #[serde(default)]
    pub files: Vec<SchemaFile>,
}

impl SchemaBundle {
    /// Parse a bundle from JSON (`{"files": [...]}`).
    pub fn from_json_str(content: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a bundle from TOML (`[[files]]` tables).
    pub fn from_toml_str(content: &str) -> GenResult<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
#[path = "schema/schema_tests.rs"]
mod schema_tests;
