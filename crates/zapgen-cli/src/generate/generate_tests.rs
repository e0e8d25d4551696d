#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

const USER_TOML: &str = r#"
[[files]]
name = "acme/user.proto"
package = "acme"
go_package = "example.com/acme;acmepb"

[[files.messages]]
name = "User"
fields = [
    { name = "id", number = 1, kind = "int32" },
    { name = "tags", number = 2, kind = "string", cardinality = "repeated" },
    { name = "home", number = 3, kind = "message", type_name = "Address" },
]

[[files.messages]]
name = "Address"
fields = [{ name = "city", number = 1, kind = "string" }]
"#;

const BAD_KEY_JSON: &str = r#"{
  "files": [{
    "name": "bad.proto",
    "package": "acme",
    "messages": [{
      "name": "Bad",
      "fields": [
        { "name": "bad", "number": 1, "kind": "message", "cardinality": "map", "type_name": "Bad.BadEntry" }
      ],
      "nested": [{
        "name": "BadEntry",
        "map_entry": true,
        "fields": [
          { "name": "key", "number": 1, "kind": "bytes" },
          { "name": "value", "number": 2, "kind": "string" }
        ]
      }]
    }]
  }]
}"#;

fn write_schema(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_bundle___toml_schema___parses_files() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(&dir, "schema.toml", USER_TOML);

    let bundle = load_bundle(&path).unwrap();

    assert_eq!(bundle.files.len(), 1);
    assert_eq!(bundle.files[0].messages.len(), 2);
}

#[test]
fn load_bundle___json_schema___parses_files() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(&dir, "schema.json", BAD_KEY_JSON);

    let bundle = load_bundle(&path).unwrap();

    assert!(bundle.files[0].messages[0].nested[0].map_entry);
}

#[test]
fn load_bundle___unknown_extension___fails() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(&dir, "schema.yaml", "files: []");

    let err = load_bundle(&path).unwrap_err();

    assert!(err.to_string().contains("Unsupported schema format"));
}

#[test]
fn load_bundle___unknown_kind___fails() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(
        &dir,
        "schema.json",
        r#"{"files": [{"name": "a.proto", "messages": [{"name": "A", "fields": [{"name": "f", "kind": "decimal"}]}]}]}"#,
    );

    let result = load_bundle(&path);

    assert!(result.is_err());
}

#[test]
fn load_config___no_path___returns_defaults() {
    let config = load_config(None).unwrap();

    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn load_config___plugins_set___is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_schema(&dir, "zap.toml", "plugins = \"grpc\"\n");

    let err = load_config(Some(&path)).unwrap_err();

    assert!(format!("{err:#}").contains("plugins are not supported"));
}

#[test]
fn run___toml_schema___writes_source_relative_file() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.toml", USER_TOML);
    let output = dir.path().join("out");

    let written = run(&schema, &output, &GeneratorConfig::default()).unwrap();

    let expected = output.join("acme/user.zap.go");
    assert_eq!(written, vec![expected.clone()]);
    let content = fs::read_to_string(expected).unwrap();
    assert!(content.contains("package acmepb\n"));
    assert!(content.contains("func (x *User) MarshalLogObject(enc zapcore.ObjectEncoder) error {"));
    assert!(content.contains("func (x *Address) MarshalLogObject(enc zapcore.ObjectEncoder) error {"));
    assert!(content.contains("enc.AddObject(\"Home\", x.Home)"));
}

#[test]
fn generate_bundle___invalid_map_key___keeps_output_and_reports_diagnostic() {
    let bundle = SchemaBundle::from_json_str(BAD_KEY_JSON).unwrap();

    let generated = generate_bundle(&bundle, &GeneratorConfig::default()).unwrap();

    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].diagnostics.len(), 1);
    assert!(generated[0].content.contains("<invalid map key: bytes>"));
}

#[test]
fn generate_bundle___duplicate_type___fails() {
    let bundle = SchemaBundle::from_toml_str(
        r#"
        [[files]]
        name = "a.proto"
        messages = [{ name = "A" }]

        [[files]]
        name = "b.proto"
        messages = [{ name = "A" }]
        "#,
    )
    .unwrap();

    let err = generate_bundle(&bundle, &GeneratorConfig::default()).unwrap_err();

    assert!(err.to_string().contains("duplicate type declaration: .A"));
}

#[test]
fn generate_with___shared_registry___matches_generate_bundle() {
    let bundle = SchemaBundle::from_toml_str(USER_TOML).unwrap();
    let registry = Registry::build(&bundle.files).unwrap();

    let shared = generate_with(&registry, &bundle, &GeneratorConfig::default()).unwrap();
    let owned = generate_bundle(&bundle, &GeneratorConfig::default()).unwrap();

    assert_eq!(shared.len(), owned.len());
    assert_eq!(shared[0].name, owned[0].name);
    assert_eq!(shared[0].content, owned[0].content);
}

#[test]
fn check___valid_schema___succeeds() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(&dir, "schema.json", BAD_KEY_JSON);

    assert!(check(&schema).is_ok());
}

#[test]
fn check___unresolved_reference___fails() {
    let dir = TempDir::new().unwrap();
    let schema = write_schema(
        &dir,
        "schema.toml",
        r#"
        [[files]]
        name = "a.proto"

        [[files.messages]]
        name = "A"
        fields = [{ name = "b", number = 1, kind = "message", type_name = "Missing" }]
        "#,
    );

    let err = check(&schema).unwrap_err();

    assert!(format!("{err:#}").contains("unresolved type reference Missing"));
}
