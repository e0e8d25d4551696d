//! Per-field container strategy.
//!
//! Decides the shape of the encoder call for one field from its cardinality:
//!
//! | Cardinality | Statement |
//! |-------------|-----------|
//! | singular | `enc.Add<Method>("Key", value)` |
//! | repeated | `enc.AddArray("Key", <closure appending each element>)` |
//! | map | `enc.AddObject("Key", <closure adding each entry>)` |
//!
//! Container wrappers are closures handed to the encoder, so elements are
//! streamed one at a time instead of being copied into a temporary
//! collection. Weak fields produce no statement.

use crate::classify::{Classification, EncoderMethod, classify};
use crate::diagnostics::Diagnostics;
use crate::error::GenResult;
use crate::map_key::{KeyExpression, stringify_key};
use crate::registry::{Registry, TypeId};
use crate::schema::{Cardinality, Field, FieldKind};

/// Receiver variable of the generated procedure.
pub const RECEIVER: &str = "x";
/// Loop variable bound to list elements and map values.
pub const ELEMENT_VAR: &str = "v";
/// Loop variable bound to map keys.
pub const KEY_VAR: &str = "k";

/// One encoder call inside a container closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCall {
    pub method: EncoderMethod,
    /// Go expression for the value, already passed through the accessor.
    pub value: String,
}

/// One top-level statement of a generated procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `enc.Add<Method>("key", value)`
    Add {
        key: String,
        method: EncoderMethod,
        value: String,
    },
    /// `enc.AddArray("key", ...)` appending every element of `source`.
    AddArray {
        key: String,
        source: String,
        element: ElementCall,
    },
    /// `enc.AddObject("key", ...)` adding every entry of `source`.
    AddObject {
        key: String,
        source: String,
        key_expr: KeyExpression,
        value: ElementCall,
    },
}

impl Statement {
    /// Log key of the statement.
    pub fn key(&self) -> &str {
        match self {
            Statement::Add { key, .. }
            | Statement::AddArray { key, .. }
            | Statement::AddObject { key, .. } => key,
        }
    }

    pub fn uses_strconv(&self) -> bool {
        matches!(self, Statement::AddObject { key_expr, .. } if key_expr.uses_strconv())
    }
}

/// Statement planned for a field, plus the message type it delegates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub statement: Statement,
    /// Message type whose own procedure this statement calls, if any.
    pub delegates_to: Option<TypeId>,
}

/// Plan the statement for one field of `owner`.
///
/// `go_name` is the field's Go struct field name within its message, as
/// assigned by [`go_field_names`](crate::naming::go_field_names); it is also
/// the log key. Returns `Ok(None)` for weak fields. Unresolvable type references are
/// fatal; disallowed map key kinds are recorded in `diagnostics` and
/// replaced with a placeholder key.
pub fn plan_field(
    registry: &Registry<'_>,
    owner: TypeId,
    field: &Field,
    go_name: &str,
    diagnostics: &mut Diagnostics,
) -> GenResult<Option<FieldPlan>> {
    if field.weak {
        return Ok(None);
    }

    let key = go_name.to_string();

    let plan = match field.cardinality {
        Cardinality::Singular => {
            let (Classification { method, accessor }, delegates_to) =
                classify_value(registry, owner, field)?;
            FieldPlan {
                statement: Statement::Add {
                    key,
                    method,
                    value: accessor.apply(&value_expr(field, go_name)),
                },
                delegates_to,
            }
        }
        Cardinality::Repeated => {
            let (Classification { method, accessor }, delegates_to) =
                classify_value(registry, owner, field)?;
            FieldPlan {
                statement: Statement::AddArray {
                    key,
                    source: format!("{RECEIVER}.{go_name}"),
                    element: ElementCall {
                        method,
                        value: accessor.apply(ELEMENT_VAR),
                    },
                },
                delegates_to,
            }
        }
        Cardinality::Map => {
            let entry = registry.map_entry(owner, field)?;
            let key_expr = stringify_key(entry.key.kind);
            if !key_expr.is_valid() {
                diagnostics.warn(
                    registry.get(owner).full_name.as_str(),
                    field.name.as_str(),
                    format!(
                        "invalid map key kind {}; emitting placeholder key",
                        entry.key.kind
                    ),
                );
            }
            let (Classification { method, accessor }, delegates_to) =
                classify_value(registry, entry.id, entry.value)?;
            FieldPlan {
                statement: Statement::AddObject {
                    key,
                    source: format!("{RECEIVER}.{go_name}"),
                    key_expr,
                    value: ElementCall {
                        method,
                        value: accessor.apply(ELEMENT_VAR),
                    },
                },
                delegates_to,
            }
        }
    };

    Ok(Some(plan))
}

/// Classify a (non-map) value field, resolving its type reference.
fn classify_value(
    registry: &Registry<'_>,
    owner: TypeId,
    field: &Field,
) -> GenResult<(Classification, Option<TypeId>)> {
    let delegates_to = match field.kind {
        FieldKind::Message => Some(registry.resolve_message(owner, field)?),
        FieldKind::Enum => {
            registry.resolve_enum(owner, field)?;
            None
        }
        _ => None,
    };
    Ok((classify(field.kind), delegates_to))
}

/// Go expression reading a singular field off the receiver.
///
/// Oneof members and explicit-presence fields are not plain struct fields
/// in protoc-gen-go output, so they are read through their getters.
fn value_expr(field: &Field, go_name: &str) -> String {
    if field.oneof.is_some() || field.optional {
        format!("{RECEIVER}.Get{go_name}()")
    } else {
        format!("{RECEIVER}.{go_name}")
    }
}
