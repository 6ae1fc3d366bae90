//! Tessera CLI - inspect and probe connection settings.

use clap::Parser;

use tessera_cli::cli::{Cli, Command};
use tessera_cli::commands;
use tessera_cli::error::CliResult;
use tessera_cli::output;

#[tokio::main]
async fn main() {
    tessera_core::logging::init();

    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Describe(args) => commands::describe::run(args).await,
        Command::Ping(args) => commands::ping::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
