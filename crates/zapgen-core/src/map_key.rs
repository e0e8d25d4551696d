//! Map key stringification.
//!
//! zap object encoders only accept string keys, so every map key is turned
//! into a Go expression of type `string`. Floating point, bytes and message
//! keys are forbidden by protobuf itself; they still produce an expression
//! (a visibly wrong placeholder literal) so a single bad field never aborts
//! generation of the whole file.

use crate::schema::FieldKind;

/// Strategy for turning a map key into a Go `string` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExpression {
    /// `strconv.FormatBool(k)`
    FormatBool,
    /// `k.String()`
    EnumText,
    /// `strconv.FormatInt(k, 10)`, widening 32-bit keys first.
    FormatInt { widen: bool },
    /// `strconv.FormatUint(k, 10)`, widening 32-bit keys first.
    FormatUint { widen: bool },
    /// `k` (already a string)
    Identity,
    /// Disallowed key kind; rendered as a placeholder string literal.
    Invalid(FieldKind),
}

impl KeyExpression {
    /// Render the expression for the key variable `var`.
    pub fn render(self, var: &str) -> String {
        match self {
            KeyExpression::FormatBool => format!("strconv.FormatBool({var})"),
            KeyExpression::EnumText => format!("{var}.String()"),
            KeyExpression::FormatInt { widen: true } => format!("strconv.FormatInt(int64({var}), 10)"),
            KeyExpression::FormatInt { widen: false } => format!("strconv.FormatInt({var}, 10)"),
            KeyExpression::FormatUint { widen: true } => {
                format!("strconv.FormatUint(uint64({var}), 10)")
            }
            KeyExpression::FormatUint { widen: false } => format!("strconv.FormatUint({var}, 10)"),
            KeyExpression::Identity => var.to_string(),
            KeyExpression::Invalid(kind) => format!("\"<invalid map key: {kind}>\""),
        }
    }

    /// Whether the rendered expression calls into Go's `strconv` package.
    pub fn uses_strconv(self) -> bool {
        matches!(
            self,
            KeyExpression::FormatBool
                | KeyExpression::FormatInt { .. }
                | KeyExpression::FormatUint { .. }
        )
    }

    pub fn is_valid(self) -> bool {
        !matches!(self, KeyExpression::Invalid(_))
    }
}

/// Choose the stringification strategy for a map key kind.
pub fn stringify_key(kind: FieldKind) -> KeyExpression {
    match kind {
        FieldKind::Bool => KeyExpression::FormatBool,
        FieldKind::Enum => KeyExpression::EnumText,
        FieldKind::Int32 => KeyExpression::FormatInt { widen: true },
        FieldKind::Int64 => KeyExpression::FormatInt { widen: false },
        FieldKind::Uint32 => KeyExpression::FormatUint { widen: true },
        FieldKind::Uint64 => KeyExpression::FormatUint { widen: false },
        FieldKind::String => KeyExpression::Identity,
        FieldKind::Float | FieldKind::Double | FieldKind::Bytes | FieldKind::Message => {
            KeyExpression::Invalid(kind)
        }
    }
}
