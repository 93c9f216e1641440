//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConfig (node URL, failovers, timeout)
//!     → client.rs (JSON-RPC providers with timeouts and failover)
//!     → types.rs ChainClient trait (get_balance, current_block)
//!     → balances poller
//! ```
//!
//! # Constraints
//! - All RPC calls have configurable timeouts
//! - Read-only: the exporter never signs or sends transactions

pub mod client;
pub mod types;

pub use client::BlockchainClient;
pub use types::{BlockchainError, BlockchainResult, ChainClient, ChainConfig};
