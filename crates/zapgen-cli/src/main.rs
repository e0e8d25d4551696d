//! protoc-gen-zap - zap logging methods for protobuf messages
//!
//! Invoked by protoc with no arguments, it runs as a protoc plugin: a
//! `CodeGeneratorRequest` is read from stdin and a `CodeGeneratorResponse`
//! written to stdout.
//!
//! Commands (standalone use):
//! - `protoc-gen-zap generate` - Generate from a JSON/TOML schema file
//! - `protoc-gen-zap check` - Validate a schema file with a dry run

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod descriptor;
mod generate;
mod logging;
mod plugin;

#[derive(Parser)]
#[command(name = "protoc-gen-zap")]
#[command(author, version, about = "Generate zap MarshalLogObject methods for protobuf messages", long_about = None)]
struct Cli {
    /// Without a command, run as a protoc plugin over stdin/stdout
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Go sources from a schema file
    Generate {
        /// Schema file (.json or .toml)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output directory for generated code
        #[arg(short, long)]
        output: PathBuf,

        /// Generator configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a schema file without writing output
    Check {
        /// Schema file (.json or .toml)
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            plugin::run()?;
        }
        Some(Commands::Generate {
            schema,
            output,
            config,
        }) => {
            let config = generate::load_config(config.as_deref())?;
            logging::init(&config.log_level)?;
            generate::run(&schema, &output, &config)?;
        }
        Some(Commands::Check { schema }) => {
            logging::init(logging::DEFAULT_LEVEL)?;
            generate::check(&schema)?;
        }
    }

    Ok(())
}
