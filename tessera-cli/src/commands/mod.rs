//! CLI command implementations.

pub mod describe;
pub mod ping;
pub mod version;

use std::path::Path;

use tessera_core::Settings;

use crate::error::CliResult;

/// Load settings from `path`, falling back to the defaults when it is missing.
pub(crate) fn load_settings(path: &Path) -> CliResult<Settings> {
    Ok(Settings::load_or_default(path)?)
}

/// Label for where settings came from.
pub(crate) fn settings_source(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        "built-in defaults".to_string()
    }
}
