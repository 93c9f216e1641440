//! Balance polling and snapshot publication.
//!
//! # Data Flow
//! ```text
//! registry entries
//!     → poller.rs (one get_balance per address, sequential)
//!     → private working copy (stale balance kept on failure)
//!     → units.rs (exact wei → ether amounts, exact total)
//!     → snapshot.rs SnapshotStore::publish (atomic swap)
//!     → exporters read SnapshotStore::current
//! ```
//!
//! # Design Decisions
//! - One writer, many lock-free readers
//! - A failed fetch never aborts the cycle and never changes the schedule
//! - No floating point anywhere in balance arithmetic

pub mod poller;
pub mod snapshot;
pub mod units;

pub use poller::BalancePoller;
pub use snapshot::{Snapshot, SnapshotStore};
pub use units::EtherAmount;
