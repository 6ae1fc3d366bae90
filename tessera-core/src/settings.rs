//! Process settings loaded from `tessera.toml`.
//!
//! Settings are built once at startup and passed to whatever needs them.
//! String values may reference environment variables with `${VAR}`,
//! `${VAR:-default}` or `${VAR:?message}`. The file is parsed first and only
//! string values are expanded, so substituted text is never read as TOML and
//! comments and keys are left alone. `$${` writes a literal `${`.
//!
//! ```toml
//! [server]
//! bind_host = "0.0.0.0"
//! bind_port = 8443
//!
//! [tls]
//! cert_path = "/etc/tessera/server.crt"
//! key_path = "/etc/tessera/server.key"
//!
//! [database]
//! username = "app"
//! password = "${DB_PASSWORD}"
//! host = "db-0:27017,db-1:27017"
//! login_database = "admin"
//!
//! [database.client_options]
//! replicaSet = "rs0"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::env::{EnvExpander, EnvSource};
use crate::error::{TesseraError, TesseraResult};

/// Default settings file name.
pub const SETTINGS_FILE_NAME: &str = "tessera.toml";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Listener address for the surrounding server.
    pub server: ServerSettings,
    /// Certificate and key files.
    pub tls: TlsSettings,
    /// Default login profile.
    pub database: ConnectionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            tls: TlsSettings::default(),
            database: default_login_profile(),
        }
    }
}

fn default_login_profile() -> ConnectionConfig {
    ConnectionConfig::builder()
        .username("admin")
        .host("localhost:27017")
        .login_database("admin")
        .build()
}

/// Bind address settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSettings {
    /// Host or address to bind.
    pub bind_host: String,
    /// Port to bind.
    pub bind_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            bind_port: 8443,
        }
    }
}

/// TLS file locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlsSettings {
    /// PEM certificate chain.
    pub cert_path: PathBuf,
    /// PEM private key.
    pub key_path: PathBuf,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("certs/server.crt"),
            key_path: PathBuf::from("certs/server.key"),
        }
    }
}

impl Settings {
    /// Load settings from a file, expanding variables from the process environment.
    pub fn from_file(path: impl AsRef<Path>) -> TesseraResult<Self> {
        Self::from_file_with_env(path, &EnvExpander::default())
    }

    /// Load settings from a file with a custom variable source.
    pub fn from_file_with_env<S: EnvSource>(
        path: impl AsRef<Path>,
        expander: &EnvExpander<S>,
    ) -> TesseraResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TesseraError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        debug!(path = %path.display(), "Loading settings");
        Self::from_toml_str_with_env(&content, expander)
    }

    /// Parse settings from TOML, expanding variables from the process environment.
    pub fn from_toml_str(content: &str) -> TesseraResult<Self> {
        Self::from_toml_str_with_env(content, &EnvExpander::default())
    }

    /// Parse settings from TOML with a custom variable source.
    pub fn from_toml_str_with_env<S: EnvSource>(
        content: &str,
        expander: &EnvExpander<S>,
    ) -> TesseraResult<Self> {
        let mut table: toml::Table = content.parse()?;
        for value in table.iter_mut().map(|(_, v)| v) {
            expand_strings(value, expander)?;
        }
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> TesseraResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            info!(path = %path.display(), "Settings file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// The default connection configuration.
    pub fn connection_config(&self) -> &ConnectionConfig {
        &self.database
    }

    /// `host:port` for the server listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.bind_host, self.server.bind_port)
    }
}

fn expand_strings<S: EnvSource>(
    value: &mut toml::Value,
    expander: &EnvExpander<S>,
) -> TesseraResult<()> {
    match value {
        toml::Value::String(text) => *text = expander.expand(text)?,
        toml::Value::Array(items) => {
            for item in items {
                expand_strings(item, expander)?;
            }
        }
        toml::Value::Table(table) => {
            for item in table.iter_mut().map(|(_, v)| v) {
                expand_strings(item, expander)?;
            }
        }
        _ => {}
    }
    Ok(())
}
