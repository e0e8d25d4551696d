//! Diagnostic logging setup.
//!
//! Everything goes to stderr: in plugin mode stdout carries the encoded
//! response.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Level used before a configuration is available.
pub const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str) -> Result<()> {
    let directive = filter_directive(std::env::var("RUST_LOG").ok(), level);
    let filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LEVEL))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(())
}

/// Filter directive from the environment, falling back to `level`.
fn filter_directive(env: Option<String>, level: &str) -> String {
    match env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => level.to_string(),
    }
}
