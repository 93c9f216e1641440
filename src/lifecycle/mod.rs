//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load registry → Connect chain node → Bind listener → Spawn poller → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Poller stops at next address → Server drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: registry, chain connection and bind errors are fatal
//! - Per-address fetch errors never reach this layer

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, StartupError};
