//! Session lifecycle around a [`DocumentDriver`].
//!
//! A handle moves through three states: Unopened, Open and Closed. `open` is
//! the only way into Open and `close` the only way into Closed. Selection and
//! reopen are valid only while Open.
//!
//! Handles are not meant for concurrent use. Each operation takes the internal
//! state with `try_lock`, so overlapping calls fail with
//! [`TesseraError::ConcurrentAccess`] instead of waiting.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::descriptor::ConnectionDescriptor;
use crate::driver::DocumentDriver;
use crate::error::{TesseraError, TesseraResult};

/// Observable lifecycle state of a [`ConnectionHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    /// Created, not yet opened.
    Unopened,
    /// Holding a live session.
    Open,
    /// Closed for good.
    Closed,
}

impl fmt::Display for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unopened => f.write_str("unopened"),
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

enum Lifecycle<S> {
    Unopened,
    Open(S),
    Closed,
}

impl<S> Lifecycle<S> {
    fn state(&self) -> HandleState {
        match self {
            Self::Unopened => HandleState::Unopened,
            Self::Open(_) => HandleState::Open,
            Self::Closed => HandleState::Closed,
        }
    }
}

struct Selected<T> {
    name: String,
    value: T,
}

struct Inner<D: DocumentDriver> {
    descriptor: ConnectionDescriptor,
    lifecycle: Lifecycle<D::Session>,
    database: Option<Selected<D::Database>>,
    collection: Option<Selected<D::Collection>>,
}

impl<D: DocumentDriver> Inner<D> {
    fn session(&self) -> TesseraResult<&D::Session> {
        match &self.lifecycle {
            Lifecycle::Open(session) => Ok(session),
            Lifecycle::Unopened => Err(TesseraError::NotConnected),
            Lifecycle::Closed => Err(TesseraError::AlreadyClosed),
        }
    }

    fn clear_selection(&mut self) {
        self.database = None;
        self.collection = None;
    }
}

/// A single driver session with at most one selected database and collection.
pub struct ConnectionHandle<D: DocumentDriver> {
    driver: Arc<D>,
    inner: Mutex<Inner<D>>,
}

impl<D: DocumentDriver> ConnectionHandle<D> {
    /// Create an unopened handle for `descriptor`.
    pub fn new(driver: Arc<D>, descriptor: ConnectionDescriptor) -> Self {
        Self {
            driver,
            inner: Mutex::new(Inner {
                descriptor,
                lifecycle: Lifecycle::Unopened,
                database: None,
                collection: None,
            }),
        }
    }

    fn lock(&self) -> TesseraResult<MutexGuard<'_, Inner<D>>> {
        self.inner
            .try_lock()
            .map_err(|_| TesseraError::ConcurrentAccess)
    }

    async fn connect(&self, descriptor: &ConnectionDescriptor) -> TesseraResult<D::Session> {
        let redacted = descriptor.redacted();
        info!(uri = %redacted, "Opening connection");

        self.driver.connect(descriptor.uri()).await.map_err(|e| {
            warn!(uri = %redacted, error = %e, "Connection failed");
            TesseraError::connection(format!("failed to connect to {}", redacted), e)
        })
    }

    /// Open a session using the stored descriptor.
    pub async fn open(&self) -> TesseraResult<()> {
        let mut inner = self.lock()?;
        match inner.lifecycle {
            Lifecycle::Unopened => {}
            Lifecycle::Open(_) => return Err(TesseraError::AlreadyOpen),
            Lifecycle::Closed => return Err(TesseraError::AlreadyClosed),
        }

        let session = self.connect(&inner.descriptor).await?;
        inner.lifecycle = Lifecycle::Open(session);
        Ok(())
    }

    /// Select a database, replacing any previous selection.
    ///
    /// The collection selection belongs to the old database and is cleared.
    pub fn select_database(&self, name: &str) -> TesseraResult<()> {
        let mut inner = self.lock()?;
        let database = self.driver.database(inner.session()?, name);

        debug!(database = %name, "Database selected");
        inner.database = Some(Selected {
            name: name.to_string(),
            value: database,
        });
        inner.collection = None;
        Ok(())
    }

    /// Select a collection in the current database, replacing any previous one.
    pub fn select_collection(&self, name: &str) -> TesseraResult<()> {
        let mut inner = self.lock()?;
        inner.session()?;
        let database = inner
            .database
            .as_ref()
            .ok_or(TesseraError::NoDatabaseSelected)?;
        let collection = self.driver.collection(&database.value, name);

        debug!(database = %database.name, collection = %name, "Collection selected");
        inner.collection = Some(Selected {
            name: name.to_string(),
            value: collection,
        });
        Ok(())
    }

    /// The currently selected database.
    pub fn database(&self) -> TesseraResult<D::Database> {
        let inner = self.lock()?;
        inner.session()?;
        inner
            .database
            .as_ref()
            .map(|selected| selected.value.clone())
            .ok_or(TesseraError::NoDatabaseSelected)
    }

    /// The currently selected collection, if any.
    pub fn collection(&self) -> TesseraResult<Option<D::Collection>> {
        let inner = self.lock()?;
        inner.session()?;
        if inner.database.is_none() {
            return Err(TesseraError::NoDatabaseSelected);
        }
        Ok(inner
            .collection
            .as_ref()
            .map(|selected| selected.value.clone()))
    }

    /// Name of the selected database.
    pub fn database_name(&self) -> TesseraResult<Option<String>> {
        let inner = self.lock()?;
        Ok(inner.database.as_ref().map(|selected| selected.name.clone()))
    }

    /// Name of the selected collection.
    pub fn collection_name(&self) -> TesseraResult<Option<String>> {
        let inner = self.lock()?;
        Ok(inner
            .collection
            .as_ref()
            .map(|selected| selected.name.clone()))
    }

    /// Close the session. A second call fails with `AlreadyClosed`.
    ///
    /// The handle stays Open, selection included, until the driver has
    /// released the session, so a failed or cancelled close can be retried.
    pub async fn close(&self) -> TesseraResult<()> {
        let mut inner = self.lock()?;
        self.driver
            .close_session(inner.session()?)
            .await
            .map_err(|e| TesseraError::connection("failed to close session", e))?;

        inner.lifecycle = Lifecycle::Closed;
        inner.clear_selection();
        info!(uri = %inner.descriptor.redacted(), "Connection closed");
        Ok(())
    }

    /// Close the session, append `extra` to the URI and open again.
    ///
    /// The previously selected database and collection are selected again on
    /// the new session. If closing the old session fails, nothing changes and
    /// the handle is still Open. If reconnecting fails, the handle is left
    /// Unopened with the extended descriptor, so `open` can retry it.
    pub async fn reopen_with_appended_parameters(&self, extra: &str) -> TesseraResult<()> {
        let mut inner = self.lock()?;
        self.driver
            .close_session(inner.session()?)
            .await
            .map_err(|e| TesseraError::connection("failed to close session for reopen", e))?;

        inner.lifecycle = Lifecycle::Unopened;
        let database = inner.database.take().map(|selected| selected.name);
        let collection = inner.collection.take().map(|selected| selected.name);
        inner.descriptor = inner.descriptor.with_appended(extra);
        debug!(extra_len = extra.len(), "Reopening with appended parameters");

        let session = self.connect(&inner.descriptor).await?;

        if let Some(database_name) = database {
            let database = self.driver.database(&session, &database_name);
            if let Some(collection_name) = collection {
                inner.collection = Some(Selected {
                    value: self.driver.collection(&database, &collection_name),
                    name: collection_name,
                });
            }
            inner.database = Some(Selected {
                name: database_name,
                value: database,
            });
        }

        inner.lifecycle = Lifecycle::Open(session);
        Ok(())
    }

    /// Convert a string into the driver's identifier type.
    pub fn to_object_id(&self, value: &str) -> TesseraResult<D::Identifier> {
        self.driver
            .parse_identifier(value)
            .map_err(|e| TesseraError::invalid_identifier(value, e))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TesseraResult<HandleState> {
        Ok(self.lock()?.lifecycle.state())
    }

    /// The descriptor the handle connects with.
    ///
    /// The returned value carries credentials; see [`ConnectionDescriptor::uri`].
    pub fn descriptor(&self) -> TesseraResult<ConnectionDescriptor> {
        Ok(self.lock()?.descriptor.clone())
    }

    /// The driver this handle uses.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }
}

impl<D: DocumentDriver> fmt::Debug for ConnectionHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ConnectionHandle");
        match self.inner.try_lock() {
            Ok(inner) => debug
                .field("descriptor", &inner.descriptor)
                .field("state", &inner.lifecycle.state())
                .field(
                    "database",
                    &inner.database.as_ref().map(|selected| &selected.name),
                )
                .field(
                    "collection",
                    &inner.collection.as_ref().map(|selected| &selected.name),
                ),
            Err(_) => debug.field("state", &"<busy>"),
        };
        debug.finish()
    }
}
