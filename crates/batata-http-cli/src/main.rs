//! Main entry point for the Batata HTTP command line client.

mod commands;
mod logging;
mod settings;

use std::sync::Arc;

use batata_http_client::HttpTransport;
use clap::Parser;
use tracing::debug;

use settings::{Cli, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;
    logging::init_logging(&settings.log_level)?;

    let endpoints = settings.endpoints()?;
    debug!("Using {} server(s): {:?}", endpoints.len(), settings.server_addrs);

    let transport = Arc::new(HttpTransport::new(settings.http_config())?);
    commands::run(cli.command, transport, endpoints).await
}
