//! Driver capability consumed by [`ConnectionHandle`](crate::handle::ConnectionHandle).

use async_trait::async_trait;

use crate::error::DriverError;

/// The operations a document-database client must provide.
///
/// Implementations own all network I/O. The handle never talks to a
/// concrete driver directly.
#[async_trait]
pub trait DocumentDriver: Send + Sync {
    /// A live client session.
    type Session: Send + Sync;
    /// A database reference obtained from a session.
    type Database: Clone + Send + Sync;
    /// A collection reference obtained from a database.
    type Collection: Clone + Send + Sync;
    /// The driver's document identifier type.
    type Identifier: Send;

    /// Open a session against `uri`.
    async fn connect(&self, uri: &str) -> Result<Self::Session, DriverError>;

    /// Release a session previously returned by [`connect`](Self::connect).
    ///
    /// The session is borrowed; the handle drops it only once this succeeds.
    async fn close_session(&self, session: &Self::Session) -> Result<(), DriverError>;

    /// Look up a database on a session.
    fn database(&self, session: &Self::Session, name: &str) -> Self::Database;

    /// Look up a collection in a database.
    fn collection(&self, database: &Self::Database, name: &str) -> Self::Collection;

    /// Parse an identifier from its string form.
    fn parse_identifier(&self, value: &str) -> Result<Self::Identifier, DriverError>;
}
