//! `tessera ping` command - Open and close a connection.

use std::sync::Arc;
use std::time::Duration;

use tessera_core::{ConnectionHandle, DocumentDriver, TesseraResult};
use tessera_mongodb::MongoDriver;

use crate::cli::PingArgs;
use crate::error::CliResult;
use crate::output::{self, kv, success};

/// Run the ping command
pub async fn run(args: PingArgs) -> CliResult<()> {
    output::header("Connection Check");

    let settings = super::load_settings(&args.config)?;
    let descriptor = settings.connection_config().descriptor()?;
    kv("Settings", super::settings_source(&args.config));
    output::descriptor(&descriptor, false);
    output::newline();

    let timeout = Duration::from_millis(args.timeout_ms);
    let driver = MongoDriver::builder()
        .app_name("tessera-cli")
        .connect_timeout(timeout)
        .server_selection_timeout(timeout)
        .build();
    let handle = ConnectionHandle::new(Arc::new(driver), descriptor);

    let total = 2 + usize::from(args.database.is_some());
    output::step(1, total, "Connecting...");
    probe(&handle, |handle| {
        if let Some(database) = &args.database {
            output::step(2, total, &format!("Selecting {}...", database));
            handle.select_database(database)?;
            if let Some(collection) = &args.collection {
                handle.select_collection(collection)?;
            }
        }
        output::step(total, total, "Closing...");
        Ok(())
    })
    .await?;

    output::newline();
    success("Connection succeeded");
    Ok(())
}

/// Open `handle`, run `checks` on it and close it again.
///
/// The handle is closed even when `checks` fails; the check error is
/// reported first.
async fn probe<D, F>(handle: &ConnectionHandle<D>, checks: F) -> CliResult<()>
where
    D: DocumentDriver,
    F: FnOnce(&ConnectionHandle<D>) -> TesseraResult<()>,
{
    handle.open().await?;
    let checked = checks(handle);
    let closed = handle.close().await;

    checked?;
    closed?;
    Ok(())
}
