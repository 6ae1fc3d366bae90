//! Connection descriptor derivation.
//!
//! A [`ConnectionConfig`] is turned into an ordered list of [`UriSegment`]s,
//! which [`render`] then joins into the final URI. No I/O happens here, so the
//! same configuration always yields the same descriptor.
//!
//! ```rust
//! use tessera_core::ConnectionConfig;
//!
//! let descriptor = ConnectionConfig::builder()
//!     .username("bob")
//!     .password("p@ss")
//!     .host("h:27017")
//!     .login_database("db1")
//!     .build()
//!     .descriptor()
//!     .unwrap();
//!
//! assert_eq!(descriptor.uri(), "mongodb://bob:p%40ss@h:27017/db1");
//! assert_eq!(descriptor.redacted(), "mongodb://bob:****@h:27017/db1");
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::config::{AuthMechanism, ConnectionConfig};
use crate::error::{TesseraError, TesseraResult};

/// Scheme for a direct host list.
pub const DIRECT_SCHEME: &str = "mongodb://";

/// Scheme for SRV record discovery.
pub const SRV_SCHEME: &str = "mongodb+srv://";

/// One piece of a derived URI, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriSegment {
    /// URI scheme including `://`.
    Scheme(&'static str),
    /// Encoded user name and optional encoded password.
    Credentials {
        /// Percent-encoded user name.
        username: String,
        /// Percent-encoded password.
        password: Option<String>,
    },
    /// Host or host list, rendered after `@`.
    Host(String),
    /// Database path segment.
    Database(String),
    /// Query parameter. The value is stored exactly as it will be rendered.
    Query {
        /// Parameter name.
        key: String,
        /// Rendered value.
        value: String,
    },
}

impl UriSegment {
    fn query(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Query {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Join segments into a URI.
///
/// The first query parameter opens with `?` and later ones with `&`. A bare
/// `/` is inserted before the `?` when no database segment precedes it.
pub fn render(segments: &[UriSegment]) -> String {
    let mut uri = String::with_capacity(64);
    let mut has_path = false;
    let mut in_query = false;

    for segment in segments {
        match segment {
            UriSegment::Scheme(scheme) => uri.push_str(scheme),
            UriSegment::Credentials { username, password } => {
                uri.push_str(username);
                if let Some(password) = password {
                    uri.push(':');
                    uri.push_str(password);
                }
            }
            UriSegment::Host(host) => {
                uri.push('@');
                uri.push_str(host);
            }
            UriSegment::Database(database) => {
                uri.push('/');
                uri.push_str(database);
                has_path = true;
            }
            UriSegment::Query { key, value } => {
                if in_query {
                    uri.push('&');
                } else {
                    if !has_path {
                        uri.push('/');
                        has_path = true;
                    }
                    uri.push('?');
                    in_query = true;
                }
                uri.push_str(key);
                uri.push('=');
                uri.push_str(value);
            }
        }
    }

    uri
}

/// Replace the password in a URI with `****`.
///
/// URIs without a password in their authority are returned unchanged.
pub fn redact(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let authority_start = scheme_end + 3;
    let rest = &uri[authority_start..];
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return uri.to_string();
    };

    match rest[..at].find(':') {
        Some(colon) => format!(
            "{}{}:****{}",
            &uri[..authority_start],
            &rest[..colon],
            &rest[at..]
        ),
        None => uri.to_string(),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Derives [`ConnectionDescriptor`]s from [`ConnectionConfig`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionDescriptorBuilder;

impl ConnectionDescriptorBuilder {
    /// Build the descriptor for `config`.
    ///
    /// A non-empty `explicit_uri` is returned verbatim. Otherwise `username`
    /// and `host` must both be non-empty.
    pub fn build(config: &ConnectionConfig) -> TesseraResult<ConnectionDescriptor> {
        if let Some(uri) = non_empty(&config.explicit_uri) {
            debug!(uri = %redact(uri), "Using explicit connection URI");
            return Ok(ConnectionDescriptor {
                uri: uri.to_string(),
                uses_explicit_uri: true,
            });
        }

        let segments = Self::segments(config)?;
        let uri = render(&segments);

        debug!(
            uri = %redact(&uri),
            segments = segments.len(),
            srv = config.use_srv_form,
            "Connection descriptor built"
        );

        Ok(ConnectionDescriptor {
            uri,
            uses_explicit_uri: false,
        })
    }

    /// Derive the URI segments for `config`, ignoring `explicit_uri`.
    pub fn segments(config: &ConnectionConfig) -> TesseraResult<Vec<UriSegment>> {
        let username = non_empty(&config.username).ok_or_else(|| {
            TesseraError::invalid_config("username is required when explicit_uri is not set")
        })?;
        let host = non_empty(&config.host).ok_or_else(|| {
            TesseraError::invalid_config("host is required when explicit_uri is not set")
        })?;

        let scheme = if config.use_srv_form {
            SRV_SCHEME
        } else {
            DIRECT_SCHEME
        };

        let mut segments = vec![
            UriSegment::Scheme(scheme),
            UriSegment::Credentials {
                username: encode(username),
                password: non_empty(&config.password).map(encode),
            },
            UriSegment::Host(host.to_string()),
        ];

        if let Some(database) = non_empty(&config.login_database) {
            segments.push(UriSegment::Database(database.to_string()));
        } else if let Some(source) = non_empty(&config.auth_source) {
            segments.push(UriSegment::query("authSource", source));
        }

        if let Some(mechanism) = config.auth_mechanism.as_deref() {
            segments.extend(Self::auth_segments(mechanism, config));
        }

        if let Some(options) = &config.client_options {
            segments.extend(
                options
                    .iter()
                    .map(|(key, value)| UriSegment::query(key, value.to_string())),
            );
        }

        Ok(segments)
    }

    fn auth_segments(mechanism: &str, config: &ConnectionConfig) -> Vec<UriSegment> {
        if let Some(tls) = &config.tls_options {
            let mut segments: Vec<_> = tls
                .iter()
                .map(|(key, value)| {
                    let rendered = if value.is_string() {
                        encode(&value.to_string())
                    } else {
                        value.to_string()
                    };
                    UriSegment::query(key, rendered)
                })
                .collect();
            segments.push(UriSegment::query("authMechanism", encode(mechanism)));
            return segments;
        }

        let mechanism = AuthMechanism::parse(mechanism).unwrap_or_else(|| {
            warn!(
                mechanism = %mechanism,
                "Unrecognized auth mechanism, falling back to DEFAULT"
            );
            AuthMechanism::Default
        });
        vec![UriSegment::query("authMechanism", mechanism.as_str())]
    }
}

/// A derived connection endpoint.
///
/// The URI carries credentials. `Debug` and `Display` only ever show the
/// redacted form; use [`uri`](Self::uri) to get the real value.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    uri: String,
    uses_explicit_uri: bool,
}

impl ConnectionDescriptor {
    /// The full URI, credentials included.
    ///
    /// This value is sensitive and must not be logged.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Whether the URI came verbatim from `explicit_uri`.
    pub fn uses_explicit_uri(&self) -> bool {
        self.uses_explicit_uri
    }

    /// The URI with its password masked.
    pub fn redacted(&self) -> String {
        redact(&self.uri)
    }

    /// A copy of this descriptor with `extra` appended to the URI.
    pub fn with_appended(&self, extra: &str) -> Self {
        let mut uri = String::with_capacity(self.uri.len() + extra.len());
        uri.push_str(&self.uri);
        uri.push_str(extra);
        Self {
            uri,
            uses_explicit_uri: self.uses_explicit_uri,
        }
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("uri", &self.redacted())
            .field("uses_explicit_uri", &self.uses_explicit_uri)
            .finish()
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> crate::config::ConnectionConfigBuilder {
        ConnectionConfig::builder()
            .username("bob")
            .password("p@ss")
            .host("h:27017")
    }

    #[test]
    fn test_login_database_example() {
        let descriptor = base().login_database("db1").build().descriptor().unwrap();
        assert_eq!(descriptor.uri(), "mongodb://bob:p%40ss@h:27017/db1");
        assert!(!descriptor.uses_explicit_uri());
    }

    #[test]
    fn test_explicit_uri_wins() {
        let config = base()
            .explicit_uri("mongodb://elsewhere:1/x")
            .auth_mechanism("X509")
            .use_srv_form(true)
            .build();
        let descriptor = config.descriptor().unwrap();
        assert_eq!(descriptor.uri(), "mongodb://elsewhere:1/x");
        assert!(descriptor.uses_explicit_uri());
    }

    #[test]
    fn test_empty_explicit_uri_is_ignored() {
        let descriptor = base().explicit_uri("").build().descriptor().unwrap();
        assert!(!descriptor.uses_explicit_uri());
        assert_eq!(descriptor.uri(), "mongodb://bob:p%40ss@h:27017");
    }

    #[test]
    fn test_srv_scheme() {
        let descriptor = base()
            .use_srv_form(true)
            .login_database("admin")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(descriptor.uri(), "mongodb+srv://bob:p%40ss@h:27017/admin");
    }

    #[test]
    fn test_auth_source_without_database_path() {
        let descriptor = base().auth_source("admin").build().descriptor().unwrap();
        assert_eq!(
            descriptor.uri(),
            "mongodb://bob:p%40ss@h:27017/?authSource=admin"
        );
    }

    #[test]
    fn test_login_database_takes_precedence() {
        let descriptor = base()
            .login_database("db1")
            .auth_source("admin")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(descriptor.uri(), "mongodb://bob:p%40ss@h:27017/db1");
    }

    #[test]
    fn test_no_password() {
        let descriptor = ConnectionConfig::builder()
            .username("bob")
            .password("")
            .host("h:27017")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(descriptor.uri(), "mongodb://bob@h:27017");
    }

    #[test]
    fn test_recognized_mechanism_unencoded() {
        let descriptor = base()
            .login_database("db1")
            .auth_mechanism("SCRAM-SHA-256")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(
            descriptor.uri(),
            "mongodb://bob:p%40ss@h:27017/db1?authMechanism=SCRAM-SHA-256"
        );
    }

    #[test]
    fn test_unrecognized_mechanism_falls_back() {
        let descriptor = base()
            .auth_source("admin")
            .auth_mechanism("PLAIN")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(
            descriptor.uri(),
            "mongodb://bob:p%40ss@h:27017/?authSource=admin&authMechanism=DEFAULT"
        );
    }

    #[test]
    fn test_tls_options_then_mechanism_then_client_options() {
        let descriptor = base()
            .login_database("db1")
            .auth_mechanism("MONGODB-X509")
            .tls_option("tlsCertificateKeyFile", "/etc/certs/client key.pem")
            .tls_option("tls", true)
            .client_option("retryWrites", false)
            .client_option("w", "majority")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(
            descriptor.uri(),
            "mongodb://bob:p%40ss@h:27017/db1\
             ?tlsCertificateKeyFile=%2Fetc%2Fcerts%2Fclient%20key.pem\
             &tls=true\
             &authMechanism=MONGODB-X509\
             &retryWrites=false\
             &w=majority"
        );
    }

    #[test]
    fn test_tls_options_ignored_without_mechanism() {
        let descriptor = base()
            .login_database("db1")
            .tls_option("tls", true)
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(descriptor.uri(), "mongodb://bob:p%40ss@h:27017/db1");
    }

    #[test]
    fn test_client_options_without_database() {
        let descriptor = base()
            .client_option("replicaSet", "rs0")
            .build()
            .descriptor()
            .unwrap();
        assert_eq!(
            descriptor.uri(),
            "mongodb://bob:p%40ss@h:27017/?replicaSet=rs0"
        );
    }

    #[test]
    fn test_missing_username_or_host() {
        let err = ConnectionConfig::builder()
            .host("h:27017")
            .build()
            .descriptor()
            .unwrap_err();
        assert!(matches!(err, TesseraError::InvalidConfig(_)));

        let err = ConnectionConfig::builder()
            .username("bob")
            .build()
            .descriptor()
            .unwrap_err();
        assert!(matches!(err, TesseraError::InvalidConfig(_)));

        let err = ConnectionConfig::default().descriptor().unwrap_err();
        assert!(matches!(err, TesseraError::InvalidConfig(_)));
    }

    #[test]
    fn test_segments_order() {
        let segments = ConnectionDescriptorBuilder::segments(
            &base().auth_source("admin").auth_mechanism("X509").build(),
        )
        .unwrap();
        assert_eq!(
            segments,
            vec![
                UriSegment::Scheme(DIRECT_SCHEME),
                UriSegment::Credentials {
                    username: "bob".into(),
                    password: Some("p%40ss".into()),
                },
                UriSegment::Host("h:27017".into()),
                UriSegment::query("authSource", "admin"),
                UriSegment::query("authMechanism", "X509"),
            ]
        );
    }

    #[test]
    fn test_redact() {
        assert_eq!(
            redact("mongodb://bob:p%40ss@h:27017/db1?w=1"),
            "mongodb://bob:****@h:27017/db1?w=1"
        );
        assert_eq!(redact("mongodb://bob@h:27017"), "mongodb://bob@h:27017");
        assert_eq!(redact("mongodb://h:27017/db"), "mongodb://h:27017/db");
        assert_eq!(redact("not a uri"), "not a uri");
    }

    #[test]
    fn test_debug_hides_password() {
        let descriptor = base().login_database("db1").build().descriptor().unwrap();
        let debug = format!("{:?}", descriptor);
        assert!(!debug.contains("p%40ss"));
        assert!(debug.contains("****"));
        assert_eq!(descriptor.to_string(), "mongodb://bob:****@h:27017/db1");
    }

    #[test]
    fn test_with_appended() {
        let descriptor = base().login_database("db1").build().descriptor().unwrap();
        let extended = descriptor.with_appended("?replicaSet=rs0");
        assert_eq!(
            extended.uri(),
            "mongodb://bob:p%40ss@h:27017/db1?replicaSet=rs0"
        );
        assert_eq!(descriptor.uri(), "mongodb://bob:p%40ss@h:27017/db1");
    }
}
