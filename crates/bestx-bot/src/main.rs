//! bestx - Entry Point
//!
//! Observation mode: quote both venues and report the best buy/sell venue
//! Trading mode: route the configured market order to the better venue

use anyhow::Result;
use bestx_bot::config::{config_path, CONFIG_ENV_VAR};
use bestx_bot::{AppConfig, Application, RunOutcome};
use clap::Parser;
use tracing::info;

/// Best-venue BTC/USDT market order router
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via BESTX_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file
    let dotenv_path = dotenv::dotenv().ok();

    let args = Args::parse();

    bestx_telemetry::init_logging()?;

    info!("Starting bestx v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config_path = config_path(args.config, std::env::var(CONFIG_ENV_VAR).ok());

    info!(config_path = %config_path, "Loading configuration");
    let config = AppConfig::from_file(&config_path)?;
    info!(mode = ?config.mode, network = ?config.network, "Configuration loaded");

    let app = Application::new(config)?;

    match app.run().await? {
        RunOutcome::Quoted { buy, sell } => {
            info!(
                buy_venue = %buy.venue(),
                buy_price = %buy.price(),
                sell_venue = %sell.venue(),
                sell_price = %sell.price(),
                "Done"
            );
        }
        RunOutcome::Traded(result) => {
            info!(
                venue = %result.venue,
                order_id = %result.order_id,
                status = %result.status,
                "Done"
            );
        }
    }

    Ok(())
}
