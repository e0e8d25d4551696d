//! Conversion from protoc descriptors to the generator's schema IR.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
use std::collections::HashSet;
use zapgen_core::{Cardinality, EnumType, Field, FieldKind, GenError, GenResult, MessageType, SchemaFile};

/// Field presence model of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    /// proto3: singular scalars are plain values.
    Implicit,
    /// proto2 and editions: singular scalars are pointers in Go.
    Explicit,
}

/// Convert one file descriptor.
///
/// Fails with [`GenError::UnknownFieldKind`] on a field type value this
/// version does not recognize.
pub fn convert_file(proto: &FileDescriptorProto) -> GenResult<SchemaFile> {
    let mut file = SchemaFile::new(proto.name(), proto.package());
    if let Some(options) = &proto.options {
        file.go_package = options.go_package.clone();
        file.deprecated = options.deprecated();
    }

    let presence = if proto.syntax() == "proto3" {
        Presence::Implicit
    } else {
        Presence::Explicit
    };

    let scope = file.scope();
    file.messages = proto
        .message_type
        .iter()
        .map(|m| convert_message(m, &scope, presence))
        .collect::<GenResult<_>>()?;
    file.enums = proto
        .enum_type
        .iter()
        .map(|e| EnumType::new(e.name()))
        .collect();

    Ok(file)
}

fn convert_message(proto: &DescriptorProto, scope: &str, presence: Presence) -> GenResult<MessageType> {
    let full_name = format!("{scope}.{}", proto.name());

    // Map fields are repeated fields whose type is a nested map entry
    let map_entries: HashSet<String> = proto
        .nested_type
        .iter()
        .filter(|nested| is_map_entry(nested))
        .map(|nested| format!("{full_name}.{}", nested.name()))
        .collect();

    let mut message = MessageType::new(proto.name());
    message.map_entry = is_map_entry(proto);
    message.fields = proto
        .field
        .iter()
        .map(|f| convert_field(f, proto, &full_name, &map_entries, presence))
        .collect::<GenResult<_>>()?;
    message.nested = proto
        .nested_type
        .iter()
        .map(|nested| convert_message(nested, &full_name, presence))
        .collect::<GenResult<_>>()?;
    message.enums = proto
        .enum_type
        .iter()
        .map(|e| EnumType::new(e.name()))
        .collect();

    Ok(message)
}

fn convert_field(
    field: &FieldDescriptorProto,
    owner: &DescriptorProto,
    owner_name: &str,
    map_entries: &HashSet<String>,
    presence: Presence,
) -> GenResult<Field> {
    let raw = field.r#type.unwrap_or_default();
    let kind = Type::try_from(raw)
        .map(field_kind)
        .map_err(|_| GenError::UnknownFieldKind {
            message: owner_name.to_string(),
            field: field.name().to_string(),
            kind: raw.to_string(),
        })?;

    let type_name = field.type_name.clone().filter(|t| !t.is_empty());
    let repeated = field.label() == Label::Repeated;
    let cardinality = match &type_name {
        Some(t) if repeated && map_entries.contains(t) => Cardinality::Map,
        _ if repeated => Cardinality::Repeated,
        _ => Cardinality::Singular,
    };

    let synthetic = field.proto3_optional();
    let oneof = match field.oneof_index {
        Some(index) if !synthetic => usize::try_from(index)
            .ok()
            .and_then(|i| owner.oneof_decl.get(i))
            .map(|decl| decl.name().to_string()),
        _ => None,
    };
    let optional = synthetic
        || (presence == Presence::Explicit && !repeated && kind != FieldKind::Message);

    Ok(Field {
        name: field.name().to_string(),
        number: field.number(),
        kind,
        cardinality,
        type_name,
        weak: field.options.as_ref().is_some_and(|o| o.weak()),
        oneof,
        optional,
    })
}

fn is_map_entry(proto: &DescriptorProto) -> bool {
    proto.options.as_ref().is_some_and(|o| o.map_entry())
}

/// Collapse a wire type into its logical kind.
fn field_kind(ty: Type) -> FieldKind {
    match ty {
        Type::Bool => FieldKind::Bool,
        Type::Int32 | Type::Sint32 | Type::Sfixed32 => FieldKind::Int32,
        Type::Uint32 | Type::Fixed32 => FieldKind::Uint32,
        Type::Int64 | Type::Sint64 | Type::Sfixed64 => FieldKind::Int64,
        Type::Uint64 | Type::Fixed64 => FieldKind::Uint64,
        Type::Float => FieldKind::Float,
        Type::Double => FieldKind::Double,
        Type::String => FieldKind::String,
        Type::Bytes => FieldKind::Bytes,
        Type::Enum => FieldKind::Enum,
        Type::Message | Type::Group => FieldKind::Message,
    }
}
