//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ytgrab_cli::Cli;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.server_config();
    tracing::debug!(target: "ytgrab.cli", ?config, "Starting server");

    ytgrab_axum::start_server(config).await
}
