//! Published balance snapshots.
//!
//! # Design Decisions
//! - A `Snapshot` is immutable once published; the poller builds the next one
//!   privately and swaps it in with a single pointer store
//! - Readers hold an `Arc<Snapshot>` and never lock
//! - Before the first cycle the store holds an empty snapshot sized to the
//!   registry

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::balances::units::EtherAmount;
use crate::registry::WatchedAddress;

/// The outcome of one complete polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Entries in registry order.
    pub entries: Vec<WatchedAddress>,
    /// Exact sum of all entry balances, unset counted as zero.
    pub total_balance: EtherAmount,
    /// Wall-clock time the cycle took.
    pub cycle_duration: Duration,
    /// Addresses fetched successfully during the cycle.
    pub loaded_count: usize,
    /// Cycle number; 0 for the initial empty snapshot.
    pub cycle: u64,
    /// When the cycle finished, `None` for the initial empty snapshot.
    pub completed_at: Option<SystemTime>,
}

impl Snapshot {
    /// The snapshot served before any cycle has completed.
    pub fn empty(registry: &[WatchedAddress]) -> Self {
        let entries = registry
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.balance = None;
                entry
            })
            .collect();

        Self {
            entries,
            total_balance: EtherAmount::ZERO,
            cycle_duration: Duration::ZERO,
            loaded_count: 0,
            cycle: 0,
            completed_at: None,
        }
    }

    /// Number of registered addresses.
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    /// Sum entry balances, treating unset as zero.
    pub fn sum_balances(entries: &[WatchedAddress]) -> EtherAmount {
        entries.iter().map(WatchedAddress::balance_or_zero).sum()
    }
}

/// Holder of the most recently published snapshot.
///
/// `publish` is intended for a single writer; `current` may be called from
/// any number of tasks concurrently.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    /// Create a store holding the empty snapshot for `registry`.
    pub fn new(registry: &[WatchedAddress]) -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::empty(registry)),
        }
    }

    /// Replace the visible snapshot.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}
