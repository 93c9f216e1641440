//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::ExporterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Metric name prefix.
pub const ENV_PREFIX: &str = "PREFIX";
/// Chain node JSON-RPC endpoint.
pub const ENV_GETH: &str = "GETH";
/// Metrics listen port.
pub const ENV_PORT: &str = "PORT";
/// Registry file path.
pub const ENV_ADDRESSES: &str = "ADDRESSES";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line. They win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub addresses_path: Option<PathBuf>,
    pub port: Option<u16>,
}

/// Parse a TOML configuration file without validating it.
pub fn load_file(path: &Path) -> Result<ExporterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using the given lookup function.
///
/// Empty values are treated as unset, except for `PREFIX` where an empty
/// value is the default anyway.
pub fn apply_env<F>(config: &mut ExporterConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(prefix) = lookup(ENV_PREFIX) {
        config.prefix = prefix;
    }

    if let Some(url) = lookup(ENV_GETH).filter(|v| !v.is_empty()) {
        config.chain.rpc_url = url;
    }

    if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
        config.listener.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key: ENV_PORT, value: port })?;
    }

    if let Some(path) = lookup(ENV_ADDRESSES).filter(|v| !v.is_empty()) {
        config.addresses_path = PathBuf::from(path);
    }

    Ok(())
}

/// Resolve the effective configuration: defaults, then the optional file,
/// then the environment, then command-line overrides. The result is validated.
pub fn load_config(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<ExporterConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => ExporterConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;

    if let Some(path) = &overrides.addresses_path {
        config.addresses_path = path.clone();
    }
    if let Some(port) = overrides.port {
        config.listener.port = port;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
