//! Ganzua CLI library
//!
//! Command-line front end over `ganzua-core`: document validation, frequency
//! document generation and listings of the supported vocabularies.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use error::{CliError, CliResult};
