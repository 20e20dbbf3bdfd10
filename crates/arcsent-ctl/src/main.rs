//! ArcSent dashboard client - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use arcsent_ctl::{AppConfig, Application, Cli, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    arcsent_telemetry::init_logging()?;

    debug!("Starting arcsent-ctl v{}", env!("CARGO_PKG_VERSION"));

    // Determine config path: CLI arg > ARCSENT_CONFIG env var > default
    let config_path = cli
        .config
        .or_else(|| std::env::var("ARCSENT_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = AppConfig::load(&config_path)?;

    let token = cli
        .token
        .or_else(|| std::env::var("ARCSENT_TOKEN").ok())
        .filter(|t| !t.is_empty());

    let app = Application::new(config, token)?;
    app.run(cli.command).await?;

    Ok(())
}
