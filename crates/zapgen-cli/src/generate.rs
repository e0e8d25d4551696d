//! Schema-file mode: generate without protoc.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zapgen_core::{
    Diagnostics, GeneratedFile, GeneratorConfig, HeaderInfo, Registry, SchemaBundle,
    generate_file,
};

/// Load a schema bundle, choosing the format from the file extension.
pub fn load_bundle(path: &Path) -> Result<SchemaBundle> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema: {:?}", path))?;

    let bundle = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => SchemaBundle::from_json_str(&content),
        Some("toml") => SchemaBundle::from_toml_str(&content),
        _ => bail!("Unsupported schema format {:?} (expected .json or .toml)", path),
    };
    bundle.with_context(|| format!("Failed to parse schema: {:?}", path))
}

/// Load the generator configuration, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;
    GeneratorConfig::from_toml(&content).with_context(|| format!("Invalid config: {:?}", path))
}

/// Generate every file of the bundle in memory.
pub fn generate_bundle(
    bundle: &SchemaBundle,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>> {
    let registry = Registry::build(&bundle.files)?;
    generate_with(&registry, bundle, config)
}

fn generate_with(
    registry: &Registry<'_>,
    bundle: &SchemaBundle,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>> {
    let header = HeaderInfo::new(env!("CARGO_PKG_VERSION"));

    bundle
        .files
        .iter()
        .map(|file| {
            generate_file(registry, file, config, &header)
                .with_context(|| format!("{}: generation failed", file.name))
        })
        .collect()
}

/// Generate Go sources for a schema file into `output`.
pub fn run(schema: &Path, output: &Path, config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    let bundle = load_bundle(schema)?;
    let generated = generate_bundle(&bundle, config)?;

    let mut written = Vec::with_capacity(generated.len());
    for file in generated {
        for diagnostic in file.diagnostics.iter() {
            warn!(file = %file.name, "{diagnostic}");
        }

        let path = output.join(&file.name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        std::fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!(path = %path.display(), "wrote");
        written.push(path);
    }

    println!("Generated {} file(s) in {}", written.len(), output.display());
    Ok(written)
}

/// Validate a schema file with a dry generation run.
pub fn check(schema: &Path) -> Result<()> {
    println!("Checking schema: {}", schema.display());

    let bundle = load_bundle(schema)?;
    let registry = Registry::build(&bundle.files)?;
    let generated = generate_with(&registry, &bundle, &GeneratorConfig::default())?;

    let mut diagnostics = Diagnostics::new();
    for file in generated {
        diagnostics.extend(file.diagnostics);
    }
    let warnings = diagnostics.len();
    for diagnostic in diagnostics {
        println!("  {diagnostic}");
    }

    println!("✓ Files: {}", bundle.files.len());
    println!("✓ Types: {}", registry.len());
    println!("✓ Warnings: {}", warnings);
    println!("\nSchema is valid!");

    Ok(())
}

#[cfg(test)]
#[path = "generate/generate_tests.rs"]
mod generate_tests;
