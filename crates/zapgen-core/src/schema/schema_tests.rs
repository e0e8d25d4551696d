#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case("\"sint32\"", FieldKind::Int32)]
#[test_case("\"sfixed32\"", FieldKind::Int32)]
#[test_case("\"fixed32\"", FieldKind::Uint32)]
#[test_case("\"sint64\"", FieldKind::Int64)]
#[test_case("\"sfixed64\"", FieldKind::Int64)]
#[test_case("\"fixed64\"", FieldKind::Uint64)]
#[test_case("\"group\"", FieldKind::Message)]
#[test_case("\"double\"", FieldKind::Double)]
fn FieldKind___wire_name___collapses_to_logical_kind(json: &str, expected: FieldKind) {
    let kind: FieldKind = serde_json::from_str(json).unwrap();

    assert_eq!(kind, expected);
}

#[test]
fn FieldKind___unknown_name___is_rejected() {
    let result = serde_json::from_str::<FieldKind>("\"decimal\"");

    assert!(result.is_err());
}

#[test]
fn FieldKind___display___matches_serde_name() {
    for kind in FieldKind::ALL {
        let json = serde_json::to_string(&kind).unwrap();

        assert_eq!(json, format!("\"{kind}\""));
    }
}

#[test]
fn Field___map_builder___sets_map_cardinality_and_entry() {
    let field = Field::map("counts", 3, "User.CountsEntry");

    assert_eq!(field.cardinality, Cardinality::Map);
    assert_eq!(field.kind, FieldKind::Message);
    assert_eq!(field.type_name.as_deref(), Some("User.CountsEntry"));
}

#[test]
fn MessageType___map_entry___numbers_key_and_value() {
    let entry = MessageType::map_entry(
        "CountsEntry",
        FieldKind::String,
        Field::scalar("ignored", 9, FieldKind::Int32),
    );

    assert!(entry.map_entry);
    assert_eq!(entry.fields[0].name, "key");
    assert_eq!(entry.fields[0].number, 1);
    assert_eq!(entry.fields[1].name, "value");
    assert_eq!(entry.fields[1].number, 2);
    assert_eq!(entry.fields[1].kind, FieldKind::Int32);
}

#[test]
fn SchemaFile___scope___prefixes_package_with_dot() {
    assert_eq!(SchemaFile::new("a.proto", "acme.v1").scope(), ".acme.v1");
    assert_eq!(SchemaFile::new("a.proto", "").scope(), "");
}

#[test]
fn SchemaBundle___from_toml___parses_nested_declarations() {
    let content = r#"
        [[files]]
        name = "acme/user.proto"
        package = "acme"
        go_package = "example.com/acme;acmepb"

        [[files.messages]]
        name = "User"
        fields = [
            { name = "id", number = 1, kind = "int32" },
            { name = "tags", number = 2, kind = "string", cardinality = "repeated" },
            { name = "counts", number = 3, kind = "message", cardinality = "map", type_name = "User.CountsEntry" },
        ]

        [[files.messages.nested]]
        name = "CountsEntry"
        map_entry = true
        fields = [
            { name = "key", number = 1, kind = "string" },
            { name = "value", number = 2, kind = "sint32" },
        ]
    "#;

    let bundle = SchemaBundle::from_toml_str(content).unwrap();

    let file = &bundle.files[0];
    assert_eq!(file.go_package.as_deref(), Some("example.com/acme;acmepb"));
    let user = &file.messages[0];
    assert_eq!(user.fields.len(), 3);
    assert_eq!(user.fields[1].cardinality, Cardinality::Repeated);
    assert!(user.nested[0].map_entry);
    assert_eq!(user.nested[0].fields[1].kind, FieldKind::Int32);
}

#[test]
fn SchemaBundle___from_json___defaults_optional_attributes() {
    let content = r#"{"files": [{"name": "a.proto", "messages": [
        {"name": "A", "fields": [{"name": "x", "kind": "bool"}]}
    ]}]}"#;

    let bundle = SchemaBundle::from_json_str(content).unwrap();

    let field = &bundle.files[0].messages[0].fields[0];
    assert_eq!(field.cardinality, Cardinality::Singular);
    assert!(!field.weak);
    assert!(!field.optional);
    assert_eq!(field.oneof, None);
    assert_eq!(bundle.files[0].package, "");
}

#[test]
fn SchemaBundle___unknown_kind___fails_to_parse() {
    let content = r#"{"files": [{"name": "a.proto", "messages": [
        {"name": "A", "fields": [{"name": "x", "kind": "uuid"}]}
    ]}]}"#;

    let result = SchemaBundle::from_json_str(content);

    assert!(matches!(result, Err(crate::GenError::SchemaParse(_))));
}
