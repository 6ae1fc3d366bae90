//! Client settings applied on top of the parsed connection URI.

use std::time::Duration;

use mongodb::options::ClientOptions;

/// Options the URI does not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoDriverConfig {
    /// Application name (shown in server logs).
    pub app_name: Option<String>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Server selection timeout. Bounds how long `connect` waits for the ping.
    pub server_selection_timeout: Option<Duration>,
    /// Minimum connection pool size.
    pub min_pool_size: Option<u32>,
    /// Maximum connection pool size.
    pub max_pool_size: Option<u32>,
    /// Direct connection (bypass replica set discovery).
    pub direct_connection: Option<bool>,
    /// Database used for the connection probe.
    pub ping_database: String,
}

impl Default for MongoDriverConfig {
    fn default() -> Self {
        Self {
            app_name: Some("tessera".to_string()),
            connect_timeout: Some(Duration::from_secs(10)),
            server_selection_timeout: Some(Duration::from_secs(30)),
            min_pool_size: None,
            max_pool_size: None,
            direct_connection: None,
            ping_database: "admin".to_string(),
        }
    }
}

impl MongoDriverConfig {
    /// Overlay these settings onto options parsed from a URI.
    ///
    /// Only fields that are set here replace what the URI specified.
    pub fn apply(&self, options: &mut ClientOptions) {
        if let Some(ref app_name) = self.app_name {
            options.app_name = Some(app_name.clone());
        }

        if let Some(connect_timeout) = self.connect_timeout {
            options.connect_timeout = Some(connect_timeout);
        }

        if let Some(selection_timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(selection_timeout);
        }

        if let Some(min_pool) = self.min_pool_size {
            options.min_pool_size = Some(min_pool);
        }

        if let Some(max_pool) = self.max_pool_size {
            options.max_pool_size = Some(max_pool);
        }

        if let Some(direct) = self.direct_connection {
            options.direct_connection = Some(direct);
        }
    }
}
