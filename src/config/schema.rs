//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the exporter.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the balance exporter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Prefix prepended to every exported metric name.
    pub prefix: String,

    /// Path to the `name:address` registry file.
    pub addresses_path: PathBuf,

    /// Metrics listener settings.
    pub listener: ListenerConfig,

    /// Chain node connection settings.
    pub chain: ChainConfig,

    /// Balance polling settings.
    pub poller: PollerConfig,

    /// Logging and self-telemetry settings.
    pub observability: ObservabilityConfig,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            addresses_path: PathBuf::from("addresses.txt"),
            listener: ListenerConfig::default(),
            chain: ChainConfig::default(),
            poller: PollerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind. Zero means "not configured".
    pub port: u16,

    /// Request timeout for the metrics endpoint in seconds.
    pub request_timeout_secs: u64,
}

impl ListenerConfig {
    /// Socket address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            request_timeout_secs: 10,
        }
    }
}

/// Chain node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL of the node.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, tried in order.
    pub failover_urls: Vec<String>,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: String::new(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 10,
        }
    }
}

/// Balance poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Sleep between the end of one cycle and the start of the next.
    pub interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self { interval_secs: 15 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Bind address for the exporter's own process metrics. Disabled when unset.
    pub telemetry_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            telemetry_address: None,
        }
    }
}
