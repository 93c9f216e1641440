//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (block number, balances)
//! - Handle timeouts and network errors gracefully
//! - Fall over to secondary endpoints when the primary fails

use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainClient, ChainConfig};

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Configuration.
    config: ChainConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Build the provider list without touching the network.
    pub fn new(config: ChainConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Connection(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let primary: Arc<dyn Provider + Send + Sync> =
            Arc::new(ProviderBuilder::new().connect_http(primary_url));
        providers.push(primary);

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                let failover: Arc<dyn Provider + Send + Sync> =
                    Arc::new(ProviderBuilder::new().connect_http(url));
                providers.push(failover);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        Ok(Self {
            providers,
            config,
            timeout_duration,
        })
    }

    /// Create a client and verify that at least one endpoint answers.
    ///
    /// HTTP transports are lazy, so reachability is checked with a chain ID
    /// query. Failure here is a startup error.
    pub async fn connect(config: ChainConfig) -> BlockchainResult<Self> {
        let client = Self::new(config)?;

        match client.get_chain_id().await {
            Ok(chain_id) => {
                tracing::info!(
                    rpc_url = %client.config.rpc_url,
                    chain_id,
                    failovers = client.providers.len() - 1,
                    "Connected to chain node"
                );
                Ok(client)
            }
            Err(e) => {
                tracing::error!(
                    rpc_url = %client.config.rpc_url,
                    error = %e,
                    "Error connecting to chain node"
                );
                Err(BlockchainError::Connection(format!(
                    "{} is unreachable: {}",
                    client.config.rpc_url, e
                )))
            }
        }
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get block number".to_string()))
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        let mut timed_out = true;
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_balance(address);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    timed_out = false;
                    tracing::debug!(provider_idx = i, %address, error = %e, "RPC error");
                }
                Err(_) => tracing::debug!(provider_idx = i, %address, "RPC timeout"),
            }
        }
        if timed_out {
            Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
        } else {
            Err(BlockchainError::Rpc("All providers failed to get balance".to_string()))
        }
    }

    /// Number of configured endpoints (primary + failovers).
    pub fn endpoint_count(&self) -> usize {
        self.providers.len()
    }
}

#[async_trait]
impl ChainClient for BlockchainClient {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        BlockchainClient::get_balance(self, address).await
    }

    async fn current_block(&self) -> BlockchainResult<u64> {
        self.get_block_number().await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("endpoints", &self.providers.len())
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
