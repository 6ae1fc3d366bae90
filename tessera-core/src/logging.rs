//! Logging setup controlled by environment variables.
//!
//! - `TESSERA_DEBUG=true|1|yes` - enable debug logging
//! - `TESSERA_LOG_LEVEL=trace|debug|info|warn|error` - explicit level
//! - `TESSERA_LOG_FORMAT=json|pretty|compact` - output format (default: json)
//!
//! Without either of the first two variables, [`init`] installs nothing and
//! the crates stay silent unless the application sets up its own subscriber.
//! Events go to stderr so command output on stdout stays machine-readable.
//!
//! ```rust,no_run
//! tessera_core::logging::init();
//! ```

use std::sync::Once;

use tracing::Level;

use crate::env::{EnvSource, ProcessEnv};

/// Crates whose events the installed filter lets through.
pub const LOG_TARGETS: &[&str] = &["tessera", "tessera_core", "tessera_mongodb", "tessera_cli"];

static INIT: Once = Once::new();

/// Event encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Multi-line, human oriented.
    Pretty,
    /// Single line per event.
    Compact,
}

impl LogFormat {
    fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }
}

/// Logging options read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Maximum level, or `None` when logging was not requested.
    pub level: Option<Level>,
    /// Output encoding.
    pub format: LogFormat,
}

impl LogSettings {
    /// Read the `TESSERA_*` variables from `source`.
    ///
    /// An unparsable `TESSERA_LOG_LEVEL` falls back to what `TESSERA_DEBUG`
    /// implies.
    pub fn from_source<S: EnvSource>(source: &S) -> Self {
        let debug = source
            .get("TESSERA_DEBUG")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"));

        let level = match source.get("TESSERA_LOG_LEVEL") {
            Some(name) => name
                .parse::<Level>()
                .ok()
                .or(Some(if debug { Level::DEBUG } else { Level::WARN })),
            None if debug => Some(Level::DEBUG),
            None => None,
        };

        let format = source
            .get("TESSERA_LOG_FORMAT")
            .map(|name| LogFormat::parse(&name))
            .unwrap_or_default();

        Self { level, format }
    }

    /// Read the settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// `EnvFilter` directives enabling [`LOG_TARGETS`] at the chosen level.
    pub fn directives(&self) -> Option<String> {
        let level = self.level?.as_str().to_ascii_lowercase();
        Some(
            LOG_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

/// Install the global subscriber once. Later calls do nothing.
pub fn init() {
    INIT.call_once(|| {
        let settings = LogSettings::from_env();
        let Some(directives) = settings.directives() else {
            return;
        };

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
            let layer = fmt::layer().with_writer(std::io::stderr);
            let registry = tracing_subscriber::registry().with(filter);
            let installed = match settings.format {
                LogFormat::Json => registry.with(layer.json()).try_init(),
                LogFormat::Compact => registry.with(layer.compact()).try_init(),
                LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::debug!(%directives, format = ?settings.format, "Tessera logging initialized");
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        let _ = directives;
    });
}
