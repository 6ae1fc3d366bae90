//! [`DocumentDriver`] implementation backed by the official MongoDB driver.

use std::time::Duration;

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tessera_core::{DocumentDriver, DriverError};
use tracing::{debug, info};

use crate::config::MongoDriverConfig;
use crate::error::{MongoError, MongoResult};

/// MongoDB driver capability.
///
/// Each session is a separate [`Client`] with its own connection pool.
#[derive(Debug, Clone, Default)]
pub struct MongoDriver {
    config: MongoDriverConfig,
}

impl MongoDriver {
    /// Create a driver with the given settings.
    pub fn new(config: MongoDriverConfig) -> Self {
        Self { config }
    }

    /// Create a builder for the driver.
    pub fn builder() -> MongoDriverBuilder {
        MongoDriverBuilder::new()
    }

    /// Get the configuration.
    pub fn config(&self) -> &MongoDriverConfig {
        &self.config
    }

    /// Build a client for `uri` and check that the server answers.
    pub async fn open_client(&self, uri: &str) -> MongoResult<Client> {
        let mut options = ClientOptions::parse(uri).await?;
        self.config.apply(&mut options);

        let hosts = options.hosts.len();
        let client = Client::with_options(options)?;

        client
            .database(&self.config.ping_database)
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| MongoError::connection(format!("ping failed: {}", e)))?;

        info!(hosts, "MongoDB client connected");
        Ok(client)
    }
}

#[async_trait]
impl DocumentDriver for MongoDriver {
    type Session = Client;
    type Database = Database;
    type Collection = Collection<Document>;
    type Identifier = ObjectId;

    async fn connect(&self, uri: &str) -> Result<Client, DriverError> {
        self.open_client(uri).await.map_err(MongoError::boxed)
    }

    async fn close_session(&self, session: &Client) -> Result<(), DriverError> {
        session.clone().shutdown().await;
        debug!("MongoDB client shut down");
        Ok(())
    }

    fn database(&self, session: &Client, name: &str) -> Database {
        session.database(name)
    }

    fn collection(&self, database: &Database, name: &str) -> Collection<Document> {
        database.collection(name)
    }

    fn parse_identifier(&self, value: &str) -> Result<ObjectId, DriverError> {
        ObjectId::parse_str(value).map_err(|e| MongoError::from(e).boxed())
    }
}

/// Builder for [`MongoDriver`].
#[derive(Debug, Default)]
pub struct MongoDriverBuilder {
    config: MongoDriverConfig,
}

impl MongoDriverBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = Some(name.into());
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.config.connect_timeout = Some(duration);
        self
    }

    /// Set the server selection timeout.
    pub fn server_selection_timeout(mut self, duration: Duration) -> Self {
        self.config.server_selection_timeout = Some(duration);
        self
    }

    /// Set the minimum pool size.
    pub fn min_pool_size(mut self, size: u32) -> Self {
        self.config.min_pool_size = Some(size);
        self
    }

    /// Set the maximum pool size.
    pub fn max_pool_size(mut self, size: u32) -> Self {
        self.config.max_pool_size = Some(size);
        self
    }

    /// Enable direct connection (bypass replica set discovery).
    pub fn direct_connection(mut self, enabled: bool) -> Self {
        self.config.direct_connection = Some(enabled);
        self
    }

    /// Database used for the connection probe.
    pub fn ping_database(mut self, name: impl Into<String>) -> Self {
        self.config.ping_database = name.into();
        self
    }

    /// Build the driver.
    pub fn build(self) -> MongoDriver {
        MongoDriver::new(self.config)
    }
}
