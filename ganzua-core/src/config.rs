//! Parse options
//!
//! Options are plain data so they can be embedded in a TOML configuration
//! file; every field has a default and may be omitted.

use crate::error::{DocumentError, Result};
use crate::text::{DefaultLocaleServices, Strength};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by the document parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Strength used for alphabet-rule character identity
    pub rules_strength: Strength,

    /// Strength used for frequency and cryptanalysis documents
    pub default_strength: Strength,

    /// Merge per-language digraph letters into one user character
    pub digraph_tailoring: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            rules_strength: Strength::Identical,
            default_strength: Strength::Tertiary,
            digraph_tailoring: true,
        }
    }
}

impl ParseOptions {
    /// Creates a new builder for ParseOptions
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| DocumentError::Config(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            DocumentError::Config(msg) => {
                DocumentError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Locale services matching these options
    pub fn services(&self) -> DefaultLocaleServices {
        DefaultLocaleServices::new(self.digraph_tailoring)
    }
}

/// Builder for ParseOptions
#[derive(Debug, Default)]
pub struct ParseOptionsBuilder {
    options: ParseOptions,
}

impl ParseOptionsBuilder {
    /// Creates a builder starting from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the strength for alphabet-rules documents
    pub fn rules_strength(mut self, strength: Strength) -> Self {
        self.options.rules_strength = strength;
        self
    }

    /// Sets the strength for frequency and cryptanalysis documents
    pub fn default_strength(mut self, strength: Strength) -> Self {
        self.options.default_strength = strength;
        self
    }

    /// Enables or disables digraph tailoring
    pub fn digraph_tailoring(mut self, enabled: bool) -> Self {
        self.options.digraph_tailoring = enabled;
        self
    }

    /// Builds the options
    pub fn build(self) -> ParseOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.rules_strength, Strength::Identical);
        assert_eq!(options.default_strength, Strength::Tertiary);
        assert!(options.digraph_tailoring);
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::builder()
            .rules_strength(Strength::Tertiary)
            .default_strength(Strength::Primary)
            .digraph_tailoring(false)
            .build();
        assert_eq!(options.rules_strength, Strength::Tertiary);
        assert_eq!(options.default_strength, Strength::Primary);
        assert!(!options.digraph_tailoring);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = ParseOptions::from_toml_str("default_strength = \"secondary\"").unwrap();
        assert_eq!(options.default_strength, Strength::Secondary);
        assert_eq!(options.rules_strength, Strength::Identical);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ParseOptions::from_toml_str("rules_strength = \"loose\"").unwrap_err();
        assert!(matches!(err, DocumentError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "digraph_tailoring = false").unwrap();
        let options = ParseOptions::from_file(file.path()).unwrap();
        assert!(!options.digraph_tailoring);
    }
}
