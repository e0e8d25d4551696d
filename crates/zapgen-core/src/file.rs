//! Output file assembly.
//!
//! Wraps the procedures of one generation run into a complete Go source
//! file: generated-code header, package clause, imports, procedures.

use crate::config::{GeneratorConfig, PathsMode};
use crate::diagnostics::Diagnostics;
use crate::emitter::{EmitScope, GeneratedUnit, generate};
use crate::error::{GenError, GenResult};
use crate::naming::{go_import_path, go_package_name, proto_base_name, strip_proto_extension};
use crate::registry::Registry;
use crate::render::{GoWriter, render_procedure};
use crate::schema::SchemaFile;

/// Name of the generator, as printed in generated headers.
pub const GENERATOR_NAME: &str = "protoc-gen-zap";

const ZAPCORE_IMPORT: &str = "go.uber.org/zap/zapcore";

/// Version information printed in the generated header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub generator_version: String,
    /// protoc version (`v3.21.12`), when known
    pub compiler_version: Option<String>,
}

impl HeaderInfo {
    pub fn new(generator_version: impl Into<String>) -> Self {
        Self {
            generator_version: generator_version.into(),
            compiler_version: None,
        }
    }
}

/// A generated output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Output path relative to the output root
    pub name: String,
    pub content: String,
    pub diagnostics: Diagnostics,
}

/// Generate the output file for one schema file.
///
/// Roots are every non-map-entry message declared in the file; reachable
/// types from other files are referenced but not emitted.
pub fn generate_file(
    registry: &Registry<'_>,
    file: &SchemaFile,
    config: &GeneratorConfig,
    header: &HeaderInfo,
) -> GenResult<GeneratedFile> {
    let roots = registry.messages_in_file(&file.name);
    let unit = generate(registry, &roots, EmitScope::File(&file.name))?;

    let content = assemble_file(file, config, header, &unit);
    Ok(GeneratedFile {
        name: output_file_name(file, config)?,
        content,
        diagnostics: unit.diagnostics,
    })
}

/// Assemble the Go source for a generated unit.
pub fn assemble_file(
    file: &SchemaFile,
    config: &GeneratorConfig,
    header: &HeaderInfo,
    unit: &GeneratedUnit,
) -> String {
    let mut w = GoWriter::new();

    write_header(&mut w, file, header);

    let go_package = effective_go_package(file, config);
    w.line(format!(
        "package {}",
        go_package_name(go_package, &file.package, &file.name)
    ));
    w.line("");

    if !unit.procedures.is_empty() {
        if unit.uses_strconv() {
            w.open("import (");
            w.line("\"strconv\"");
            w.line("");
            w.line(format!("\"{ZAPCORE_IMPORT}\""));
            w.close(")");
        } else {
            w.line(format!("import \"{ZAPCORE_IMPORT}\""));
        }
        w.line("");
    }

    let options = config.render_options();
    for (i, procedure) in unit.procedures.iter().enumerate() {
        if i > 0 {
            w.line("");
        }
        render_procedure(&mut w, procedure, options);
    }

    w.finish()
}

fn write_header(w: &mut GoWriter, file: &SchemaFile, header: &HeaderInfo) {
    w.line(format!("// Code generated by {GENERATOR_NAME}. DO NOT EDIT."));
    w.line("// versions:");
    w.line(format!(
        "// \t{GENERATOR_NAME} {}",
        header.generator_version
    ));
    w.line(format!(
        "// \tprotoc        {}",
        header.compiler_version.as_deref().unwrap_or("(unknown)")
    ));
    if file.deprecated {
        w.line(format!("// {} is a deprecated file.", file.name));
    } else {
        w.line(format!("// source: {}", file.name));
    }
    w.line("");
}

/// `go_package` for a file, honoring `M<file>=<path>` overrides.
fn effective_go_package<'c>(file: &'c SchemaFile, config: &'c GeneratorConfig) -> Option<&'c str> {
    config
        .import_overrides
        .get(&file.name)
        .map(String::as_str)
        .or(file.go_package.as_deref())
}

/// Output path for a schema file.
pub fn output_file_name(file: &SchemaFile, config: &GeneratorConfig) -> GenResult<String> {
    match config.paths {
        PathsMode::SourceRelative => Ok(format!(
            "{}{}",
            strip_proto_extension(&file.name),
            config.file_suffix
        )),
        PathsMode::Import => {
            let go_package = effective_go_package(file, config).ok_or_else(|| {
                GenError::Config(format!(
                    "unable to determine Go import path for {:?}",
                    file.name
                ))
            })?;
            Ok(format!(
                "{}/{}{}",
                go_import_path(go_package),
                proto_base_name(&file.name),
                config.file_suffix
            ))
        }
    }
}
