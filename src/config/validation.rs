//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check required values that have no sensible default (node URL, port)
//! - Validate value ranges (timeouts > 0, interval > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExporterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ExporterConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("chain node URL is required (set GETH or chain.rpc_url)")]
    MissingRpcUrl,

    #[error("invalid chain node URL '{url}': {reason}")]
    InvalidRpcUrl { url: String, reason: String },

    #[error("listen port is required (set PORT or listener.port)")]
    MissingPort,

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid telemetry address '{0}'")]
    InvalidTelemetryAddress(String),
}

/// Check every semantic rule and collect all violations.
pub fn validate_config(config: &ExporterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.rpc_url.trim().is_empty() {
        errors.push(ValidationError::MissingRpcUrl);
    } else if let Err(e) = config.chain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::InvalidRpcUrl {
            url: config.chain.rpc_url.clone(),
            reason: e.to_string(),
        });
    }

    for failover in &config.chain.failover_urls {
        if let Err(e) = failover.parse::<url::Url>() {
            errors.push(ValidationError::InvalidRpcUrl {
                url: failover.clone(),
                reason: e.to_string(),
            });
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::MissingPort);
    }

    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "listener.request_timeout_secs" });
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "chain.rpc_timeout_secs" });
    }

    if config.poller.interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "poller.interval_secs" });
    }

    if let Some(addr) = &config.observability.telemetry_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidTelemetryAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
