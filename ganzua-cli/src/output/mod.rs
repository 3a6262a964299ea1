//! Output formatting module

use anyhow::Result;
use ganzua_core::{Document, UNDEFINED_COINCIDENCE_INDEX};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Trait for validation report formatters
pub trait OutputFormatter {
    /// Report the outcome for one document
    fn format_summary(&mut self, summary: &DocumentSummary) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per document
    Text,
    /// JSON array of document summaries
    Json,
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    /// Path as given on the command line
    pub path: String,
    /// Root element of the expected document family
    pub kind: &'static str,
    /// Whether the document parsed and validated
    pub valid: bool,
    /// Document locale, when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Family-specific counts and flags
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
    /// Failure message, when invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentSummary {
    /// Summary of a valid document
    pub fn valid(path: &Path, document: &Document) -> Self {
        let mut details = Map::new();
        let locale = match document {
            Document::AlphabetRules(rules) => {
                details.insert(
                    "include_exclusively".into(),
                    json!(rules.include_exclusively().len()),
                );
                details.insert("include".into(), json!(rules.include().len()));
                details.insert("ignore".into(), json!(rules.ignore().len()));
                details.insert("replace".into(), json!(rules.replace().len()));
                rules.locale()
            }
            Document::LanguageFrequencies(profile) => {
                details.insert("characters".into(), json!(profile.alphabet().len()));
                details.insert("bigrams".into(), json!(profile.bigrams().len()));
                details.insert("trigrams".into(), json!(profile.trigrams().len()));
                if profile.coincidence_index() != UNDEFINED_COINCIDENCE_INDEX {
                    details.insert(
                        "coincidence_index".into(),
                        json!(profile.coincidence_index()),
                    );
                }
                profile.locale()
            }
            Document::Cryptanalysis(scenario) => {
                details.insert("cipher".into(), json!(scenario.cipher().tag()));
                details.insert(
                    "ciphertext_characters".into(),
                    json!(scenario.ciphertext().chars().count()),
                );
                details.insert("alphabets".into(), json!(scenario.substitution().len()));
                details.insert(
                    "injective".into(),
                    json!(scenario.substitution_is_injective()),
                );
                details.insert(
                    "frequencies".into(),
                    json!(scenario.language_frequencies().is_some()),
                );
                scenario.locale()
            }
        };

        Self {
            path: path.display().to_string(),
            kind: document.kind().root_element(),
            valid: true,
            locale: Some(locale.to_string()),
            details,
            error: None,
        }
    }

    /// Summary of a rejected document
    pub fn invalid(path: &Path, kind: &'static str, error: impl std::fmt::Display) -> Self {
        Self {
            path: path.display().to_string(),
            kind,
            valid: false,
            locale: None,
            details: Map::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Formatter for `format` writing to stdout
pub fn formatter(format: OutputFormat, pretty_json: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::stdout()),
        OutputFormat::Json => Box::new(JsonFormatter::new(std::io::stdout(), pretty_json)),
    }
}
