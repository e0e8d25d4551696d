//! Generator configuration

use crate::error::{GenError, GenResult};
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How output file names are derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathsMode {
    /// Next to the proto file: `dir/user.proto` -> `dir/user.zap.go`
    #[default]
    SourceRelative,
    /// Under the Go import path: `example.com/acme/user.zap.go`
    Import,
}

/// Generator configuration
///
/// In plugin mode this comes from the protoc parameter string
/// (`--zap_opt=paths=import,nil_guard=false`); in schema-file mode it can
/// also be loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Output path layout
    #[serde(default)]
    pub paths: PathsMode,

    /// Suffix replacing `.proto` in output file names
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,

    /// Log level for the generator's own diagnostics
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit a nil-receiver guard at the top of every procedure
    #[serde(default = "default_nil_guard")]
    pub nil_guard: bool,

    /// Go import path overrides per proto file (`M<file>=<path>`)
    #[serde(default)]
    pub import_overrides: BTreeMap<String, String>,

    /// Deprecated protoc-gen-go option; rejected when set
    #[serde(default)]
    pub plugins: Option<String>,
}

fn default_file_suffix() -> String {
    ".zap.go".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_nil_guard() -> bool {
    true
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            paths: PathsMode::default(),
            file_suffix: default_file_suffix(),
            log_level: default_log_level(),
            nil_guard: default_nil_guard(),
            import_overrides: BTreeMap::new(),
            plugins: None,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a protoc parameter string of comma-separated `key=value` pairs.
    pub fn from_parameter(parameter: &str) -> GenResult<Self> {
        let mut config = Self::default();

        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            config.set(key, value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML.
    pub fn from_toml(content: &str) -> GenResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| GenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply one `key=value` option.
    pub fn set(&mut self, key: &str, value: &str) -> GenResult<()> {
        match key {
            "paths" => {
                self.paths = match value {
                    "source_relative" => PathsMode::SourceRelative,
                    "import" => PathsMode::Import,
                    other => {
                        return Err(GenError::Config(format!(
                            "invalid paths value {other:?} (expected import or source_relative)"
                        )));
                    }
                }
            }
            "file_suffix" => self.file_suffix = value.to_string(),
            "log_level" => self.log_level = value.to_string(),
            "nil_guard" => {
                self.nil_guard = value
                    .parse()
                    .map_err(|_| GenError::Config(format!("invalid nil_guard value {value:?}")))?
            }
            "plugins" => self.plugins = Some(value.to_string()),
            _ if key.starts_with('M') && key.len() > 1 => {
                self.import_overrides
                    .insert(key[1..].to_string(), value.to_string());
            }
            _ => return Err(GenError::Config(format!("unknown parameter {key:?}"))),
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> GenResult<()> {
        if self.plugins.as_deref().is_some_and(|p| !p.is_empty()) {
            return Err(GenError::Config(
                "plugins are not supported; use a dedicated generator for gRPC".to_string(),
            ));
        }

        if self.file_suffix.is_empty() {
            return Err(GenError::Config("file_suffix cannot be empty".to_string()));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(GenError::Config(format!(
                "invalid log_level {:?} (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            nil_guard: self.nil_guard,
        }
    }
}
