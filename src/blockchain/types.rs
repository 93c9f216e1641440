//! Chain client seam and error definitions.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// The node could not be reached or the endpoint is unusable.
    #[error("Connection error: {0}")]
    Connection(String),

    /// RPC request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// The two chain queries the exporter depends on.
///
/// Implemented by [`BlockchainClient`](crate::blockchain::BlockchainClient)
/// for JSON-RPC nodes; tests substitute scripted fakes.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Balance of `address` at the latest block, in wei.
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256>;

    /// Height of the latest block.
    async fn current_block(&self) -> BlockchainResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection error: refused");
    }
}
