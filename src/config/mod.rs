//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (PREFIX / GETH / PORT / ADDRESSES environment)
//!     → command-line overrides
//!     → validation.rs (semantic checks)
//!     → ExporterConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::{
    ChainConfig, ExporterConfig, ListenerConfig, LogFormat, ObservabilityConfig, PollerConfig,
};
pub use validation::ValidationError;
