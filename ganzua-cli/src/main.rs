//! Command-line entry point for ganzua

use anyhow::Result;
use clap::Parser;
use ganzua_cli::commands::Commands;
use ganzua_cli::config::CliConfig;
use std::path::PathBuf;

/// Validate and generate Ganzua cryptanalysis documents
#[derive(Debug, Parser)]
#[command(name = "ganzua", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(short, long, global = true, value_name = "FILE", env = "GANZUA_CONFIG")]
    config: Option<PathBuf>,

    /// Suppress log output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    log::debug!("arguments: {cli:?}");

    let config = CliConfig::load(cli.config.as_deref())?;
    cli.command.execute(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ganzua", "list", "ciphers", "-vv", "--quiet"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }
}
