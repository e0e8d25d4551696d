//! Property-based tests for the generation engine
//!
//! Builds random schemas (including self-references, cycles, weak fields and
//! maps with arbitrary key kinds) and checks the invariants every run must
//! hold: totality, determinism, single emission per type and field order.

use proptest::prelude::*;
use std::collections::HashSet;
use zapgen_core::{
    EmitScope, Field, FieldKind, GeneratorConfig, HeaderInfo, MessageType, Registry, SchemaFile,
    Statement, generate, generate_file,
};

const MAX_TYPES: usize = 6;

/// Shape of one field before it is bound to concrete type names.
#[derive(Debug, Clone)]
enum FieldShape {
    Scalar(FieldKind, bool),
    Message(usize, bool),
    Map(FieldKind, Option<usize>),
    Weak(usize),
}

fn arb_scalar_kind() -> impl Strategy<Value = FieldKind> {
    prop::sample::select(vec![
        FieldKind::Bool,
        FieldKind::Int32,
        FieldKind::Uint32,
        FieldKind::Int64,
        FieldKind::Uint64,
        FieldKind::Float,
        FieldKind::Double,
        FieldKind::String,
        FieldKind::Bytes,
    ])
}

// Strategy: any key kind, including the disallowed ones
fn arb_key_kind() -> impl Strategy<Value = FieldKind> {
    prop::sample::select(FieldKind::ALL.to_vec())
}

fn arb_field_shape() -> impl Strategy<Value = FieldShape> {
    prop_oneof![
        (arb_scalar_kind(), any::<bool>()).prop_map(|(k, r)| FieldShape::Scalar(k, r)),
        (0..MAX_TYPES, any::<bool>()).prop_map(|(t, r)| FieldShape::Message(t, r)),
        (arb_key_kind(), prop::option::of(0..MAX_TYPES)).prop_map(|(k, v)| FieldShape::Map(k, v)),
        (0..MAX_TYPES).prop_map(FieldShape::Weak),
    ]
}

// Strategy: 1..=MAX_TYPES messages with up to 6 fields each
fn arb_schema() -> impl Strategy<Value = Vec<Vec<FieldShape>>> {
    prop::collection::vec(prop::collection::vec(arb_field_shape(), 0..6), 1..=MAX_TYPES)
}

fn type_name(index: usize, count: usize) -> String {
    format!("T{}", index % count)
}

fn build_file(shapes: &[Vec<FieldShape>]) -> SchemaFile {
    let count = shapes.len();
    let mut file = SchemaFile::new("prop.proto", "prop");

    for (i, fields) in shapes.iter().enumerate() {
        let mut message = MessageType::new(type_name(i, count));
        for (j, shape) in fields.iter().enumerate() {
            let name = format!("f{j}");
            let number = j as i32 + 1;
            let field = match shape {
                FieldShape::Scalar(kind, repeated) => {
                    let field = Field::scalar(name, number, *kind);
                    if *repeated { field.repeated() } else { field }
                }
                FieldShape::Message(target, repeated) => {
                    let field = Field::message(name, number, type_name(*target, count));
                    if *repeated { field.repeated() } else { field }
                }
                FieldShape::Weak(target) => {
                    Field::message(name, number, type_name(*target, count)).weak()
                }
                FieldShape::Map(key, value) => {
                    let entry_name = format!("F{j}Entry");
                    let value = match value {
                        Some(target) => Field::message("value", 2, type_name(*target, count)),
                        None => Field::scalar("value", 2, FieldKind::String),
                    };
                    message = message.with_nested(MessageType::map_entry(
                        entry_name.clone(),
                        *key,
                        value,
                    ));
                    Field::map(name, number, format!("{}.{entry_name}", type_name(i, count)))
                }
            };
            message = message.with_field(field);
        }
        file = file.with_message(message);
    }

    file
}

proptest! {
    /// Property: every well-formed schema generates without error
    #[test]
    fn proptest_generation_is_total(shapes in arb_schema()) {
        let files = vec![build_file(&shapes)];
        let registry = Registry::build(&files).expect("generated schema has unique names");
        let roots = registry.messages_in_file("prop.proto");

        let result = generate(&registry, &roots, EmitScope::All);

        prop_assert!(result.is_ok(), "generation failed: {:?}", result.err());
    }

    /// Property: identical input yields byte-identical output
    #[test]
    fn proptest_generation_is_deterministic(shapes in arb_schema()) {
        let files = vec![build_file(&shapes)];
        let registry = Registry::build(&files).expect("generated schema has unique names");
        let config = GeneratorConfig::default();
        let header = HeaderInfo::new("0.0.0");

        let first = generate_file(&registry, &files[0], &config, &header)
            .expect("generation should succeed");
        let second = generate_file(&registry, &files[0], &config, &header)
            .expect("generation should succeed");

        prop_assert_eq!(first.content, second.content);
    }

    /// Property: each reachable type is emitted exactly once, cycles included
    #[test]
    fn proptest_each_type_emitted_once(shapes in arb_schema()) {
        let files = vec![build_file(&shapes)];
        let registry = Registry::build(&files).expect("generated schema has unique names");
        let roots = registry.messages_in_file("prop.proto");

        let unit = generate(&registry, &roots, EmitScope::All).expect("generation should succeed");

        let mut seen = HashSet::new();
        for procedure in &unit.procedures {
            prop_assert!(seen.insert(procedure.type_id), "{} emitted twice", procedure.full_name);
        }
        prop_assert_eq!(unit.procedures.len(), shapes.len());
    }

    /// Property: statements follow declaration order, weak fields omitted
    #[test]
    fn proptest_statement_order_matches_fields(shapes in arb_schema()) {
        let files = vec![build_file(&shapes)];
        let registry = Registry::build(&files).expect("generated schema has unique names");
        let roots = registry.messages_in_file("prop.proto");

        let unit = generate(&registry, &roots, EmitScope::All).expect("generation should succeed");

        for (i, fields) in shapes.iter().enumerate() {
            let name = format!(".prop.{}", type_name(i, shapes.len()));
            let procedure = unit.procedure(&name).expect("every root is emitted");
            let expected: Vec<String> = fields
                .iter()
                .enumerate()
                .filter(|(_, shape)| !matches!(shape, FieldShape::Weak(_)))
                .map(|(j, _)| format!("F{j}"))
                .collect();
            let actual: Vec<&str> = procedure.statements.iter().map(Statement::key).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    /// Property: one diagnostic per map field with a disallowed key kind
    #[test]
    fn proptest_invalid_keys_are_reported(shapes in arb_schema()) {
        let files = vec![build_file(&shapes)];
        let registry = Registry::build(&files).expect("generated schema has unique names");
        let roots = registry.messages_in_file("prop.proto");

        let unit = generate(&registry, &roots, EmitScope::All).expect("generation should succeed");

        let expected = shapes
            .iter()
            .flatten()
            .filter(|shape| matches!(
                shape,
                FieldShape::Map(
                    FieldKind::Float | FieldKind::Double | FieldKind::Bytes | FieldKind::Message,
                    _
                )
            ))
            .count();
        prop_assert_eq!(unit.diagnostics.len(), expected);
    }
}
