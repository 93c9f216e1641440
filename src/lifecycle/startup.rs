//! Startup orchestration.
//!
//! # Order
//! 1. Load the address registry (fatal on I/O failure)
//! 2. Connect to the chain node (fatal if unreachable)
//! 3. Start the optional telemetry endpoint
//! 4. Bind the metrics listener (fatal)
//! 5. Spawn the balance poller, log the banner, serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::balances::{BalancePoller, SnapshotStore};
use crate::blockchain::{BlockchainClient, BlockchainError, ChainClient};
use crate::config::ExporterConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::registry::{load_addresses, RegistryError, WatchedAddress};

/// Conditions that stop the exporter before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("cannot reach chain node: {0}")]
    Chain(#[from] BlockchainError),

    #[error("failed to start telemetry endpoint: {0}")]
    Telemetry(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to listen on {address}: {source}")]
    Listen {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the exporter with a JSON-RPC chain client until SIGINT/SIGTERM.
pub async fn start(config: ExporterConfig) -> Result<(), StartupError> {
    let registry = load_addresses(&config.addresses_path)?;
    let client = BlockchainClient::connect(config.chain.clone()).await?;

    if let Some(addr) = &config.observability.telemetry_address {
        // Validated at config load.
        if let Ok(addr) = addr.parse::<SocketAddr>() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = bind(&config.listener.bind_address()).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    serve(&config, registry, Arc::new(client), listener, shutdown).await
}

/// Bind the metrics listener.
pub async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Listen {
            address: address.to_string(),
            source,
        })
}

/// Spawn the poller and serve `/metrics` on `listener` until `shutdown`.
///
/// The poller is stopped and awaited before returning.
pub async fn serve(
    config: &ExporterConfig,
    registry: Vec<WatchedAddress>,
    client: Arc<dyn ChainClient>,
    listener: TcpListener,
    shutdown: Shutdown,
) -> Result<(), StartupError> {
    let server_shutdown = shutdown.subscribe();
    let store = Arc::new(SnapshotStore::new(&registry));
    let poller = BalancePoller::new(
        Arc::clone(&client),
        Arc::clone(&store),
        Duration::from_secs(config.poller.interval_secs),
    );
    let poller_handle = tokio::spawn(poller.run(shutdown.subscribe()));

    let block = match client.current_block().await {
        Ok(block) => block,
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching current block height");
            0
        }
    };

    let local_addr = listener.local_addr().map_err(StartupError::Serve)?;
    tracing::info!(
        address = %local_addr,
        node = %config.chain.rpc_url,
        block,
        wallets = registry.len(),
        "eth-balance-exporter has started on port {} using node {} at block #{}",
        local_addr.port(),
        config.chain.rpc_url,
        block
    );

    let server = HttpServer::new(
        store,
        &config.prefix,
        Duration::from_secs(config.listener.request_timeout_secs),
    );
    let result = server.run(listener, server_shutdown).await;

    // The server may also stop on its own error; make sure the poller follows.
    shutdown.trigger();
    if let Err(e) = poller_handle.await {
        tracing::error!(error = %e, "Balance poller task failed");
    }

    result.map_err(StartupError::Serve)
}
