//! Error handling for the CLI application

use std::fmt;
use std::path::Path;

/// CLI-specific failures
#[derive(Debug)]
pub enum CliError {
    /// A document failed to parse or validate
    InvalidDocument {
        /// Path of the rejected document
        path: String,
        /// What went wrong
        reason: String,
    },
    /// Configuration file problem
    ConfigError(String),
    /// Output target could not be chosen or written
    OutputError(String),
}

impl CliError {
    /// Invalid document at `path`
    pub fn invalid_document(path: &Path, reason: impl fmt::Display) -> Self {
        CliError::InvalidDocument {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidDocument { path, reason } => {
                write!(f, "Invalid document {path}: {reason}")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::OutputError(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_document_display() {
        let error =
            CliError::invalid_document(Path::new("rules/es.xml"), "duplicated entry \"a\"");
        assert_eq!(
            error.to_string(),
            "Invalid document rules/es.xml: duplicated entry \"a\""
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("unknown field `colour`".to_string());
        assert_eq!(error.to_string(), "Configuration error: unknown field `colour`");
    }

    #[test]
    fn test_error_converts_into_anyhow() {
        let failure: CliResult<()> = Err(CliError::OutputError("disk full".to_string()).into());
        let err = failure.unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert_eq!(err.to_string(), "Output error: disk full");
    }
}
