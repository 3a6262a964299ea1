//! Configuration module

use crate::error::CliError;
use anyhow::Result;
use ganzua_core::ParseOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Options handed to the document parsers
    #[serde(default)]
    pub parsing: ParseOptions,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for generated frequency documents (current directory if unset)
    pub frequencies_dir: Option<PathBuf>,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frequencies_dir: None,
            pretty_json: true,
        }
    }
}

impl CliConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Load the configuration file, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        log::debug!("loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::ConfigError(format!("cannot read {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!("{}: {e}", path.display())).into()
        })
    }

    /// Directory generated frequency documents go to
    pub fn frequencies_dir(&self) -> &Path {
        self.output
            .frequencies_dir
            .as_deref()
            .unwrap_or_else(|| Path::new("."))
    }
}
