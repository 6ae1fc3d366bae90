//! Error types for the MongoDB driver.

use tessera_core::DriverError;
use thiserror::Error;

/// Result type for MongoDB driver operations.
pub type MongoResult<T> = Result<T, MongoError>;

/// Errors raised by [`MongoDriver`](crate::MongoDriver).
#[derive(Error, Debug)]
pub enum MongoError {
    /// MongoDB driver error.
    #[error("mongodb error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// Invalid ObjectId.
    #[error("invalid object id: {0}")]
    InvalidObjectId(#[from] bson::oid::Error),

    /// The server did not answer the connection probe.
    #[error("connection error: {0}")]
    Connection(String),
}

impl MongoError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Box this error for the driver capability boundary.
    pub fn boxed(self) -> DriverError {
        Box::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = MongoError::connection("ping failed");
        assert!(err.is_connection_error());
        assert_eq!(err.to_string(), "connection error: ping failed");
    }

    #[test]
    fn test_boxed_keeps_variant() {
        let oid_err = bson::oid::ObjectId::parse_str("nope").unwrap_err();
        let boxed = MongoError::from(oid_err).boxed();

        let err = boxed.downcast_ref::<MongoError>().unwrap();
        assert!(matches!(err, MongoError::InvalidObjectId(_)));
        assert!(!err.is_connection_error());
    }
}
