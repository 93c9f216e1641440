//! Address registry.
//!
//! # Data Flow
//! ```text
//! addresses.txt (name:address per line)
//!     → loader.rs (split on first ':', validate address, skip bad lines)
//!     → Vec<WatchedAddress> in file order
//!     → balance poller seed
//! ```

pub mod loader;
pub mod types;

pub use loader::{load_addresses, parse_addresses, parse_line, RegistryError};
pub use types::WatchedAddress;
