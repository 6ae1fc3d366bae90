//! CLI error types and result alias.

use miette::Diagnostic;
use tessera_core::TesseraError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// Settings could not be loaded or describe an invalid connection
    #[error("Configuration error: {0}")]
    #[diagnostic(code(tessera::config))]
    Config(String),

    /// The database could not be reached
    #[error("Connection error: {0}")]
    #[diagnostic(code(tessera::connection))]
    Connection(String),

    /// Any other command failure
    #[error("Command error: {0}")]
    #[diagnostic(code(tessera::command))]
    Command(String),
}

impl From<TesseraError> for CliError {
    fn from(err: TesseraError) -> Self {
        match err {
            TesseraError::InvalidConfig(_)
            | TesseraError::Env(_)
            | TesseraError::Io { .. }
            | TesseraError::Toml(_) => CliError::Config(err.to_string()),
            TesseraError::Connection { .. } => {
                let mut message = err.to_string();
                if let Some(source) = std::error::Error::source(&err) {
                    message.push_str(": ");
                    message.push_str(&source.to_string());
                }
                CliError::Connection(message)
            }
            other => CliError::Command(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Command(format!("Failed to serialize output: {}", err))
    }
}
