//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tessera_core::SETTINGS_FILE_NAME;

/// Tessera CLI - connection descriptors for document databases
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(author = "Pegasus Heavy Industries LLC")]
#[command(version)]
#[command(about = "Tessera CLI - connection descriptors for document databases", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the connection URI derived from the settings file
    Describe(DescribeArgs),

    /// Open and close a connection to check the settings
    Ping(PingArgs),

    /// Display version information
    Version,
}

/// Arguments for the `describe` command
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Settings file (defaults are used when it does not exist)
    #[arg(short, long, env = "TESSERA_CONFIG", default_value = SETTINGS_FILE_NAME)]
    pub config: PathBuf,

    /// Print the URI with its password
    #[arg(long)]
    pub show_secrets: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `ping` command
#[derive(Args, Debug)]
pub struct PingArgs {
    /// Settings file (defaults are used when it does not exist)
    #[arg(short, long, env = "TESSERA_CONFIG", default_value = SETTINGS_FILE_NAME)]
    pub config: PathBuf,

    /// Database to select after connecting
    #[arg(long)]
    pub database: Option<String>,

    /// Collection to select (requires --database)
    #[arg(long, requires = "database")]
    pub collection: Option<String>,

    /// Server selection timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    pub timeout_ms: u64,
}

/// Output format for `describe`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable
    #[default]
    Text,
    /// JSON object
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_describe() {
        let cli = Cli::parse_from(["tessera", "describe", "--show-secrets", "--format", "json"]);
        match cli.command {
            Command::Describe(args) => {
                assert!(args.show_secrets);
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_collection_requires_database() {
        let result = Cli::try_parse_from(["tessera", "ping", "--collection", "users"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
