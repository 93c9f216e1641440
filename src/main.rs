//! Ethereum balance exporter.
//!
//! Polls the balance of every address listed in the registry file against a
//! JSON-RPC node and serves the latest complete result on `GET /metrics`.
//!
//! # Architecture Overview
//!
//! ```text
//!   addresses.txt ──▶ registry ──▶ balance poller ──▶ snapshot store ──▶ /metrics
//!                                     │    ▲              (ArcSwap)       exporter
//!                          get_balance│    │wei
//!                                     ▼    │
//!                                  chain node (JSON-RPC)
//! ```

use clap::Parser;
use std::path::PathBuf;

use eth_balance_exporter::config::{self, ObservabilityConfig, Overrides};
use eth_balance_exporter::lifecycle;
use eth_balance_exporter::observability::logging;

#[derive(Parser)]
#[command(name = "eth-balance-exporter", version)]
#[command(about = "Export Ethereum address balances as a metrics page", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registry file of `name:address` lines (overrides ADDRESSES).
    #[arg(short, long)]
    addresses: Option<PathBuf>,

    /// Listen port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = Overrides {
        addresses_path: cli.addresses,
        port: cli.port,
    };

    let config = match config::load_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(e) => {
            // Logging is not configured yet; fall back to defaults to report.
            let _ = logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("failed to initialize logging: {e}");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addresses = %config.addresses_path.display(),
        port = config.listener.port,
        interval_secs = config.poller.interval_secs,
        "eth-balance-exporter starting"
    );

    if let Err(e) = lifecycle::start(config).await {
        tracing::error!(error = %e, "Fatal error");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
