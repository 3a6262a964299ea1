//! Validate command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::{formatter, DocumentSummary, OutputFormat};
use anyhow::Result;
use clap::Args;
use ganzua_core::{parse_document_file, DocumentKind};
use std::path::PathBuf;

/// Document family selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    /// alphabetRules documents
    Rules,
    /// languageFrequencies documents
    Frequencies,
    /// cryptanalysis documents
    Cryptanalysis,
}

impl KindArg {
    /// Every family, in listing order
    pub const ALL: [KindArg; 3] = [KindArg::Rules, KindArg::Frequencies, KindArg::Cryptanalysis];

    /// Name accepted by `--kind`
    pub fn name(&self) -> &'static str {
        match self {
            KindArg::Rules => "rules",
            KindArg::Frequencies => "frequencies",
            KindArg::Cryptanalysis => "cryptanalysis",
        }
    }
}

impl From<KindArg> for DocumentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Rules => DocumentKind::AlphabetRules,
            KindArg::Frequencies => DocumentKind::LanguageFrequencies,
            KindArg::Cryptanalysis => DocumentKind::Cryptanalysis,
        }
    }
}

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Document family every input must belong to
    #[arg(short, long, value_enum)]
    pub kind: KindArg,

    /// Documents to validate
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ValidateArgs {
    /// Execute the validate command
    ///
    /// Stops at the first invalid document; the report still covers every
    /// document checked up to that point.
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        let kind = DocumentKind::from(self.kind);
        let mut output = formatter(self.format, config.output.pretty_json);
        log::info!("validating {} {} document(s)", self.files.len(), kind.root_element());

        for path in &self.files {
            match parse_document_file(kind, path, &config.parsing) {
                Ok(document) => {
                    log::debug!("{} is valid", path.display());
                    output.format_summary(&DocumentSummary::valid(path, &document))?;
                }
                Err(e) => {
                    output.format_summary(&DocumentSummary::invalid(
                        path,
                        kind.root_element(),
                        &e,
                    ))?;
                    output.finish()?;
                    return Err(CliError::invalid_document(path, e).into());
                }
            }
        }

        output.finish()
    }
}
