//! Ethereum balance exporter library.

pub mod balances;
pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use balances::{BalancePoller, Snapshot, SnapshotStore};
pub use config::ExporterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
