//! Error types for descriptor building and handle lifecycle.

use thiserror::Error;

/// Result type for Tessera operations.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Boxed error reported by a [`DocumentDriver`](crate::driver::DocumentDriver).
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while building descriptors or driving a handle.
#[derive(Error, Debug)]
pub enum TesseraError {
    /// The connection configuration is missing required fields.
    #[error("invalid connection config: {0}")]
    InvalidConfig(String),

    /// The driver failed to open or reopen a session.
    #[error("connection error: {message}")]
    Connection {
        /// What the handle was doing when the driver failed.
        message: String,
        /// Underlying driver error.
        #[source]
        source: Option<DriverError>,
    },

    /// The handle has not been opened yet.
    #[error("handle is not connected")]
    NotConnected,

    /// A collection was requested before any database was selected.
    #[error("no database selected")]
    NoDatabaseSelected,

    /// `open` was called on a handle that already holds a session.
    #[error("handle is already open")]
    AlreadyOpen,

    /// The handle has been closed.
    #[error("handle is already closed")]
    AlreadyClosed,

    /// The driver rejected an identifier string.
    #[error("invalid identifier '{value}'")]
    InvalidIdentifier {
        /// The rejected input.
        value: String,
        /// Underlying parse error.
        #[source]
        source: Option<DriverError>,
    },

    /// Another mutating operation is in flight on the same handle.
    #[error("concurrent access to connection handle")]
    ConcurrentAccess,

    /// Environment variable expansion failed.
    #[error("environment error: {0}")]
    Env(String),

    /// Settings file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for the expected shape.
    #[error("invalid settings: {0}")]
    Toml(#[from] toml::de::Error),
}

impl TesseraError {
    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a connection error wrapping a driver failure.
    pub fn connection(message: impl Into<String>, source: DriverError) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(value: impl Into<String>, source: DriverError) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            source: Some(source),
        }
    }

    /// Create an environment expansion error.
    pub fn env(message: impl Into<String>) -> Self {
        Self::Env(message.into())
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Check if this error comes from misusing the handle lifecycle.
    pub fn is_lifecycle_error(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::NoDatabaseSelected
                | Self::AlreadyOpen
                | Self::AlreadyClosed
                | Self::ConcurrentAccess
        )
    }
}
