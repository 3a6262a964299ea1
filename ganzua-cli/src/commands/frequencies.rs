//! Frequencies command implementation

use crate::config::CliConfig;
use crate::error::CliError;
use anyhow::{Context, Result};
use clap::Args;
use ganzua_core::{profile_from_rules_file, write_language_frequencies};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Arguments for the frequencies command
#[derive(Debug, Args)]
pub struct FrequenciesArgs {
    /// Alphabet-rules document naming the source text
    #[arg(value_name = "RULES")]
    pub rules: PathBuf,

    /// Output file (default: `<language><n>.xml` in the frequencies directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// First `<stem><n>.xml` in `dir` that does not exist yet, counting from 1
pub fn next_free_path(dir: &Path, stem: &str) -> PathBuf {
    (1u32..)
        .map(|n| dir.join(format!("{stem}{n}.xml")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| dir.join(format!("{stem}.xml")))
}

impl FrequenciesArgs {
    /// Execute the frequencies command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        log::info!("building frequencies from {}", self.rules.display());
        let profile = profile_from_rules_file(&self.rules, &config.parsing)
            .map_err(|e| CliError::invalid_document(&self.rules, e))?;

        let target = match &self.output {
            Some(path) => path.clone(),
            None => {
                let dir = config.frequencies_dir();
                fs::create_dir_all(dir).map_err(|e| {
                    CliError::OutputError(format!("cannot create {}: {e}", dir.display()))
                })?;
                next_free_path(dir, profile.locale().language())
            }
        };

        let file = File::create(&target)
            .with_context(|| format!("cannot create {}", target.display()))?;
        write_language_frequencies(&profile, BufWriter::new(file))
            .map_err(|e| CliError::OutputError(format!("{}: {e}", target.display())))?;

        log::debug!(
            "{} characters, {} bigrams, {} trigrams",
            profile.alphabet().len(),
            profile.bigrams().len(),
            profile.trigrams().len()
        );
        println!("{}", target.display());
        Ok(())
    }
}
