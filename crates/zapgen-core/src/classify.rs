//! Field kind to encoder method mapping.
//!
//! # Mappings
//!
//! | Kind | Method | Accessor |
//! |------|--------|----------|
//! | `bool` | `Bool` | identity |
//! | `enum` | `String` | `v.String()` |
//! | `int32` / `uint32` | `Int32` / `Uint32` | identity |
//! | `int64` / `uint64` | `Int64` / `Uint64` | identity |
//! | `float` / `double` | `Float32` / `Float64` | identity |
//! | `string` | `String` | identity |
//! | `bytes` | `Binary` | identity |
//! | `message` | `Object` | nested `MarshalLogObject` |

use crate::schema::FieldKind;
use std::fmt;

/// Logical encoder operation, rendered as `Add<Method>` or `Append<Method>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderMethod {
    Bool,
    String,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Binary,
    Object,
}

impl EncoderMethod {
    /// Method suffix on `zapcore.ObjectEncoder` (`enc.Add<suffix>`).
    pub fn object_suffix(self) -> &'static str {
        match self {
            EncoderMethod::Bool => "Bool",
            EncoderMethod::String => "String",
            EncoderMethod::Int32 => "Int32",
            EncoderMethod::Uint32 => "Uint32",
            EncoderMethod::Int64 => "Int64",
            EncoderMethod::Uint64 => "Uint64",
            EncoderMethod::Float32 => "Float32",
            EncoderMethod::Float64 => "Float64",
            EncoderMethod::Binary => "Binary",
            EncoderMethod::Object => "Object",
        }
    }

    /// Method suffix on `zapcore.ArrayEncoder` (`ae.Append<suffix>`).
    ///
    /// `ArrayEncoder` has no `AppendBinary`; raw bytes go through
    /// `AppendByteString`.
    pub fn array_suffix(self) -> &'static str {
        match self {
            EncoderMethod::Binary => "ByteString",
            other => other.object_suffix(),
        }
    }
}

impl fmt::Display for EncoderMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_suffix())
    }
}

/// Transform applied to a raw field value before it reaches the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTransform {
    /// Pass the value through unchanged.
    Identity,
    /// Render an enum value as its textual name.
    EnumText,
    /// Hand the value to the nested type's own marshal procedure.
    Delegate,
}

impl ValueTransform {
    /// Apply the transform to a Go value expression.
    ///
    /// Delegation needs no wrapping: every generated message type implements
    /// `zapcore.ObjectMarshaler`, so the value is passed as-is.
    pub fn apply(self, expr: &str) -> String {
        match self {
            ValueTransform::Identity | ValueTransform::Delegate => expr.to_string(),
            ValueTransform::EnumText => format!("{expr}.String()"),
        }
    }
}

/// Result of classifying a field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub method: EncoderMethod,
    pub accessor: ValueTransform,
}

impl Classification {
    const fn new(method: EncoderMethod, accessor: ValueTransform) -> Self {
        Self { method, accessor }
    }

    const fn direct(method: EncoderMethod) -> Self {
        Self::new(method, ValueTransform::Identity)
    }
}

/// Map a field kind to its encoder method and value accessor.
pub fn classify(kind: FieldKind) -> Classification {
    match kind {
        FieldKind::Bool => Classification::direct(EncoderMethod::Bool),
        FieldKind::Enum => Classification::new(EncoderMethod::String, ValueTransform::EnumText),
        FieldKind::Int32 => Classification::direct(EncoderMethod::Int32),
        FieldKind::Uint32 => Classification::direct(EncoderMethod::Uint32),
        FieldKind::Int64 => Classification::direct(EncoderMethod::Int64),
        FieldKind::Uint64 => Classification::direct(EncoderMethod::Uint64),
        FieldKind::Float => Classification::direct(EncoderMethod::Float32),
        FieldKind::Double => Classification::direct(EncoderMethod::Float64),
        FieldKind::String => Classification::direct(EncoderMethod::String),
        FieldKind::Bytes => Classification::direct(EncoderMethod::Binary),
        FieldKind::Message => Classification::new(EncoderMethod::Object, ValueTransform::Delegate),
    }
}
