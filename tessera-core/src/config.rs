//! Connection configuration.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::{ConnectionDescriptor, ConnectionDescriptorBuilder};
use crate::error::TesseraResult;

/// Ordered option map. Keys render in insertion order.
pub type OptionMap = IndexMap<String, OptionValue>;

/// Structured input for deriving a connection URI.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Pre-built endpoint. When non-empty, all derivation is skipped.
    pub explicit_uri: Option<String>,
    /// Login user name.
    pub username: Option<String>,
    /// Login password.
    pub password: Option<String>,
    /// `hostname:port`, or a comma-separated list of them.
    pub host: Option<String>,
    /// Database that credentials are validated against.
    pub login_database: Option<String>,
    /// Alternative to `login_database`, sent as the `authSource` option.
    pub auth_source: Option<String>,
    /// Authentication mechanism name, e.g. `SCRAM-SHA-256`.
    pub auth_mechanism: Option<String>,
    /// TLS parameters, only emitted together with `auth_mechanism`.
    pub tls_options: Option<OptionMap>,
    /// Use the `mongodb+srv://` discovery scheme.
    pub use_srv_form: bool,
    /// Extra driver parameters appended as query options.
    pub client_options: Option<OptionMap>,
}

impl ConnectionConfig {
    /// Create a configuration that uses a pre-built URI as is.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self {
            explicit_uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }

    /// Derive the connection descriptor for this configuration.
    pub fn descriptor(&self) -> TesseraResult<ConnectionDescriptor> {
        ConnectionDescriptorBuilder::build(self)
    }
}

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag, rendered as `true`/`false`.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    String(String),
}

impl OptionValue {
    /// Whether this value is a string (and therefore subject to encoding).
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Authentication mechanisms the builder passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMechanism {
    /// Let the server negotiate.
    #[default]
    Default,
    /// SCRAM with SHA-256.
    ScramSha256,
    /// SCRAM with SHA-1.
    ScramSha1,
    /// Client certificate authentication.
    X509,
}

impl AuthMechanism {
    /// Wire name of the mechanism.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::ScramSha256 => "SCRAM-SHA-256",
            Self::ScramSha1 => "SCRAM-SHA-1",
            Self::X509 => "X509",
        }
    }

    /// Match a wire name exactly. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "DEFAULT" => Some(Self::Default),
            "SCRAM-SHA-256" => Some(Self::ScramSha256),
            "SCRAM-SHA-1" => Some(Self::ScramSha1),
            "X509" => Some(Self::X509),
            _ => None,
        }
    }
}

impl fmt::Display for AuthMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for [`ConnectionConfig`].
#[derive(Debug, Default)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a pre-built URI.
    pub fn explicit_uri(mut self, uri: impl Into<String>) -> Self {
        self.config.explicit_uri = Some(uri.into());
        self
    }

    /// Set the user name.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Set the host or comma-separated host list.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    /// Set the login database.
    pub fn login_database(mut self, database: impl Into<String>) -> Self {
        self.config.login_database = Some(database.into());
        self
    }

    /// Set the auth source.
    pub fn auth_source(mut self, source: impl Into<String>) -> Self {
        self.config.auth_source = Some(source.into());
        self
    }

    /// Set the authentication mechanism by wire name.
    pub fn auth_mechanism(mut self, mechanism: impl Into<String>) -> Self {
        self.config.auth_mechanism = Some(mechanism.into());
        self
    }

    /// Add a TLS parameter.
    pub fn tls_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.config
            .tls_options
            .get_or_insert_with(OptionMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Select the SRV discovery scheme.
    pub fn use_srv_form(mut self, enabled: bool) -> Self {
        self.config.use_srv_form = enabled;
        self
    }

    /// Add a driver parameter.
    pub fn client_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.config
            .client_options
            .get_or_insert_with(OptionMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}
