//! Error types for the generation engine

use thiserror::Error;

/// Result type alias for generation operations
pub type GenResult<T> = Result<T, GenError>;

/// Fatal error for a generation run
///
/// Any of these aborts the whole run; no partial output is valid afterwards.
/// Per-field problems that generation can recover from are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// A field references a type that is not part of the provided set
    #[error("{message}.{field}: unresolved type reference {type_name}")]
    UnresolvedType {
        message: String,
        field: String,
        type_name: String,
    },

    /// An enum, message, or map field without a type reference
    #[error("{message}.{field}: missing type reference")]
    MissingTypeName { message: String, field: String },

    /// A map field whose entry type is not a two-field key/value type
    #[error("{message}.{field}: malformed map entry: {reason}")]
    MalformedMapEntry {
        message: String,
        field: String,
        reason: String,
    },

    /// A field kind this version does not know how to log
    #[error("{message}.{field}: unknown field kind {kind}")]
    UnknownFieldKind {
        message: String,
        field: String,
        kind: String,
    },

    /// The same fully-qualified type name was declared twice
    #[error("duplicate type declaration: {0}")]
    DuplicateType(String),

    /// A root type requested by name is not declared
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Schema file could not be parsed
    #[error("schema parse error: {0}")]
    SchemaParse(String),
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        GenError::SchemaParse(err.to_string())
    }
}

impl From<toml::de::Error> for GenError {
    fn from(err: toml::de::Error) -> Self {
        GenError::SchemaParse(err.to_string())
    }
}
