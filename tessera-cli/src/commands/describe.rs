//! `tessera describe` command - Show the derived connection URI.

use serde_json::json;
use tessera_core::ConnectionDescriptorBuilder;

use crate::cli::{DescribeArgs, OutputFormat};
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the describe command
pub async fn run(args: DescribeArgs) -> CliResult<()> {
    let settings = super::load_settings(&args.config)?;
    let config = settings.connection_config();
    let descriptor = ConnectionDescriptorBuilder::build(config)?;

    match args.format {
        OutputFormat::Json => {
            let uri = if args.show_secrets {
                descriptor.uri().to_string()
            } else {
                descriptor.redacted()
            };
            let value = json!({
                "uri": uri,
                "uses_explicit_uri": descriptor.uses_explicit_uri(),
                "srv": config.use_srv_form,
                "bind_address": settings.bind_address(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            output::header("Connection");
            kv("Settings", super::settings_source(&args.config));
            output::descriptor(&descriptor, args.show_secrets);
            kv("Scheme", if config.use_srv_form { "srv" } else { "direct" });
            output::newline();

            output::section("Server");
            kv("Bind", settings.bind_address());
            kv("Certificate", settings.tls.cert_path.display());
            kv("Key", settings.tls.key_path.display());
            output::newline();

            if args.show_secrets {
                output::warn("The URI above contains credentials");
            }
        }
    }

    Ok(())
}
