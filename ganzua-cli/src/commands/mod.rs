//! CLI command implementations

use crate::config::CliConfig;
use anyhow::Result;
use clap::Subcommand;
use ganzua_core::{CipherFamily, DocumentKind};

pub mod frequencies;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse and validate documents of one family
    Validate(validate::ValidateArgs),

    /// Build a language-frequencies document from alphabet rules
    Frequencies(frequencies::FrequenciesArgs),

    /// List accepted vocabularies
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ListCommands {
    /// Cipher family tags accepted by cryptanalysis documents
    Ciphers,

    /// Document families with their root elements and namespaces
    Kinds,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self, config: &CliConfig) -> Result<()> {
        match self {
            Commands::Validate(args) => args.execute(config),
            Commands::Frequencies(args) => args.execute(config),
            Commands::List { subcommand } => {
                for line in subcommand.lines() {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Lines printed for this listing
    pub fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Ciphers => CipherFamily::ALL
                .iter()
                .map(|family| {
                    let shape = if family.is_polyalphabetic() {
                        "polyalphabetic"
                    } else {
                        "monoalphabetic"
                    };
                    format!("{:<16} {shape}", family.tag())
                })
                .collect(),
            ListCommands::Kinds => validate::KindArg::ALL
                .iter()
                .map(|arg| {
                    let kind = DocumentKind::from(*arg);
                    format!(
                        "{:<14} {:<20} {}",
                        arg.name(),
                        kind.root_element(),
                        kind.namespace()
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cipher_listing() {
        let lines = ListCommands::Ciphers.lines();
        assert_eq!(lines.len(), CipherFamily::ALL.len());
        assert!(lines[0].starts_with("Caesar"));
        assert!(lines[0].ends_with("monoalphabetic"));
        assert!(lines.iter().any(|l| l.starts_with("Vigenère") && l.ends_with(" polyalphabetic")));
    }

    #[test]
    fn test_kind_listing() {
        let lines = ListCommands::Kinds.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("rules"));
        assert!(lines[0].contains("alphabetRules"));
        assert!(lines[2].ends_with(ganzua_core::CRYPTANALYSIS_NAMESPACE));
    }
}
