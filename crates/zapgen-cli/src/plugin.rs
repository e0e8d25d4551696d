//! protoc plugin protocol.
//!
//! protoc writes an encoded `CodeGeneratorRequest` to stdin and expects an
//! encoded `CodeGeneratorResponse` on stdout. Generation failures travel
//! back inside the response; only I/O and decode failures exit non-zero.

use crate::{descriptor, logging};
use anyhow::{Context, Result, anyhow};
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse, Version};
use std::io::{Read, Write};
use tracing::{debug, info, warn};
use zapgen_core::{GenResult, GeneratorConfig, HeaderInfo, Registry, SchemaFile, generate_file};

/// Run one plugin invocation over stdin/stdout.
pub fn run() -> Result<()> {
    let mut input = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut input)
        .context("Failed to read CodeGeneratorRequest from stdin")?;
    let request = CodeGeneratorRequest::decode(input.as_slice())
        .context("Failed to decode CodeGeneratorRequest")?;

    let config = GeneratorConfig::from_parameter(request.parameter());
    let level = config
        .as_ref()
        .map_or(logging::DEFAULT_LEVEL, |c| c.log_level.as_str());
    logging::init(level)?;

    let response = match config {
        Ok(config) => respond(&request, &config),
        Err(err) => error_response(anyhow!(err)),
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}

/// Build the response for a decoded request.
pub fn respond(request: &CodeGeneratorRequest, config: &GeneratorConfig) -> CodeGeneratorResponse {
    match generate_files(request, config) {
        Ok(file) => CodeGeneratorResponse {
            supported_features: Some(Feature::Proto3Optional as u64),
            file,
            ..Default::default()
        },
        Err(err) => error_response(err),
    }
}

fn error_response(err: anyhow::Error) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(format!("{err:#}")),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

fn generate_files(request: &CodeGeneratorRequest, config: &GeneratorConfig) -> Result<Vec<File>> {
    let schemas = request
        .proto_file
        .iter()
        .map(descriptor::convert_file)
        .collect::<GenResult<Vec<SchemaFile>>>()?;
    let registry = Registry::build(&schemas)?;
    debug!(files = schemas.len(), types = registry.len(), "registry built");

    let header = HeaderInfo {
        generator_version: env!("CARGO_PKG_VERSION").to_string(),
        compiler_version: request.compiler_version.as_ref().map(format_version),
    };

    let mut out = Vec::with_capacity(request.file_to_generate.len());
    for name in &request.file_to_generate {
        let schema = schemas
            .iter()
            .find(|s| s.name == *name)
            .ok_or_else(|| anyhow!("{name}: listed in file_to_generate but not in proto_file"))?;

        let generated = generate_file(&registry, schema, config, &header)
            .with_context(|| format!("{name}: generation failed"))?;
        for diagnostic in generated.diagnostics.iter() {
            warn!(file = %name, "{diagnostic}");
        }
        info!(file = %name, output = %generated.name, "generated");

        out.push(File {
            name: Some(generated.name),
            content: Some(generated.content),
            ..Default::default()
        });
    }

    Ok(out)
}

/// Format a protoc version the way it is printed in generated headers.
fn format_version(version: &Version) -> String {
    let mut text = format!(
        "v{}.{}.{}",
        version.major(),
        version.minor(),
        version.patch()
    );
    if !version.suffix().is_empty() {
        text.push('-');
        text.push_str(version.suffix());
    }
    text
}
