//! Balance polling loop.
//!
//! # Responsibilities
//! - Visit every registered address once per cycle, in registry order
//! - Keep the previous balance when a single fetch fails
//! - Publish each completed cycle as one immutable snapshot
//! - Sleep a fixed interval between cycles, regardless of failures

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::sleep;

use crate::balances::snapshot::{Snapshot, SnapshotStore};
use crate::balances::units::EtherAmount;
use crate::blockchain::ChainClient;
use crate::observability::metrics;

/// Background task that refreshes balances and publishes snapshots.
pub struct BalancePoller {
    client: Arc<dyn ChainClient>,
    store: Arc<SnapshotStore>,
    interval: Duration,
    /// Last published snapshot; source of stale balances on failure.
    previous: Arc<Snapshot>,
}

impl BalancePoller {
    /// Create a poller that continues from whatever `store` currently holds.
    pub fn new(
        client: Arc<dyn ChainClient>,
        store: Arc<SnapshotStore>,
        interval: Duration,
    ) -> Self {
        let previous = store.current();
        Self {
            client,
            store,
            interval,
            previous,
        }
    }

    /// Run one full cycle and publish its snapshot.
    pub async fn poll_once(&mut self) -> Arc<Snapshot> {
        match self.cycle(None).await {
            Some(snapshot) => snapshot,
            None => Arc::clone(&self.previous),
        }
    }

    /// Poll until a shutdown signal arrives.
    ///
    /// Shutdown is honoured between address fetches and during the sleep. A
    /// cycle interrupted by shutdown is not published.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            addresses = self.previous.total_count(),
            interval_secs = self.interval.as_secs(),
            "Balance poller starting"
        );

        loop {
            if self.cycle(Some(&mut shutdown)).await.is_none() {
                break;
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!("Balance poller stopped");
    }

    /// Returns `None` only when cancelled mid-cycle.
    async fn cycle(
        &mut self,
        mut shutdown: Option<&mut broadcast::Receiver<()>>,
    ) -> Option<Arc<Snapshot>> {
        let started = Instant::now();
        let cycle = self.previous.cycle + 1;

        // Private working copy; balances start at the last published values.
        let mut entries = self.previous.entries.clone();
        let mut loaded_count = 0;

        tracing::info!(cycle, wallets = entries.len(), "Checking wallets");

        for entry in entries.iter_mut() {
            if let Some(rx) = shutdown.as_deref_mut() {
                if shutdown_requested(rx) {
                    tracing::info!(cycle, "Shutdown requested, abandoning cycle");
                    return None;
                }
            }

            match self.client.get_balance(entry.parsed).await {
                Ok(wei) => {
                    entry.balance = Some(EtherAmount::from_wei(wei));
                    loaded_count += 1;
                }
                Err(e) => {
                    metrics::record_fetch_failure();
                    tracing::warn!(
                        cycle,
                        name = %entry.name,
                        address = %entry.address,
                        error = %e,
                        "Error fetching balance, keeping previous value"
                    );
                }
            }
        }

        let total_balance = Snapshot::sum_balances(&entries);
        let cycle_duration = started.elapsed();
        let total_count = entries.len();

        let snapshot = self.store.publish(Snapshot {
            entries,
            total_balance,
            cycle_duration,
            loaded_count,
            cycle,
            completed_at: Some(SystemTime::now()),
        });
        self.previous = Arc::clone(&snapshot);

        metrics::record_cycle(cycle_duration, loaded_count, total_count);
        tracing::info!(
            cycle,
            wallets = total_count,
            loaded = loaded_count,
            duration_secs = cycle_duration.as_secs_f64(),
            sleep_secs = self.interval.as_secs(),
            "Finished checking wallets"
        );

        Some(snapshot)
    }
}

/// A sent value, a lagged receiver and a dropped sender all mean stop.
fn shutdown_requested(rx: &mut broadcast::Receiver<()>) -> bool {
    !matches!(rx.try_recv(), Err(TryRecvError::Empty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{BlockchainError, BlockchainResult};
    use crate::registry::WatchedAddress;
    use alloy::primitives::{Address, U256};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Chain client answering from per-address scripts; an exhausted
    /// script repeats its last answer.
    #[derive(Default)]
    struct ScriptedChain {
        scripts: Mutex<HashMap<Address, VecDeque<Option<u128>>>>,
        calls: Mutex<Vec<Address>>,
    }

    impl ScriptedChain {
        fn script(self, address: Address, answers: &[Option<u128>]) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(address, answers.iter().copied().collect());
            self
        }
    }

    #[async_trait]
    impl ChainClient for ScriptedChain {
        async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
            self.calls.lock().unwrap().push(address);
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts
                .get_mut(&address)
                .ok_or_else(|| BlockchainError::Rpc("unknown address".to_string()))?;
            let answer = if script.len() > 1 {
                script.pop_front().flatten()
            } else {
                script.front().copied().flatten()
            };
            answer
                .map(U256::from)
                .ok_or_else(|| BlockchainError::Rpc("scripted failure".to_string()))
        }

        async fn current_block(&self) -> BlockchainResult<u64> {
            Ok(1)
        }
    }

    fn alice() -> WatchedAddress {
        let parsed = Address::repeat_byte(0xaa);
        WatchedAddress::new("alice", parsed.to_string(), parsed)
    }

    fn bob() -> WatchedAddress {
        let parsed = Address::repeat_byte(0xbb);
        WatchedAddress::new("bob", parsed.to_string(), parsed)
    }

    fn poller(
        chain: ScriptedChain,
        registry: &[WatchedAddress],
    ) -> (BalancePoller, Arc<SnapshotStore>) {
        let store = Arc::new(SnapshotStore::new(registry));
        let poller =
            BalancePoller::new(Arc::new(chain), Arc::clone(&store), Duration::from_millis(10));
        (poller, store)
    }

    const ONE_ETH: u128 = 1_000_000_000_000_000_000;
    const TWO_AND_HALF_ETH: u128 = 2_500_000_000_000_000_000;

    #[tokio::test]
    async fn test_single_cycle() {
        let chain = ScriptedChain::default()
            .script(alice().parsed, &[Some(ONE_ETH)])
            .script(bob().parsed, &[Some(TWO_AND_HALF_ETH)]);
        let (mut poller, store) = poller(chain, &[alice(), bob()]);

        let snapshot = poller.poll_once().await;

        assert_eq!(snapshot.cycle, 1);
        assert_eq!(snapshot.loaded_count, 2);
        assert_eq!(snapshot.total_count(), 2);
        assert_eq!(snapshot.entries[0].balance.unwrap().to_string(), "1");
        assert_eq!(snapshot.entries[1].balance.unwrap().to_string(), "2.5");
        assert_eq!(snapshot.total_balance.to_fixed_string(), "3.500000000000000000");
        assert!(snapshot.completed_at.is_some());
        assert!(Arc::ptr_eq(&snapshot, &store.current()));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_balance() {
        let chain = ScriptedChain::default()
            .script(alice().parsed, &[Some(ONE_ETH)])
            .script(bob().parsed, &[Some(TWO_AND_HALF_ETH), None]);
        let (mut poller, store) = poller(chain, &[alice(), bob()]);

        poller.poll_once().await;
        let second = poller.poll_once().await;

        assert_eq!(second.cycle, 2);
        assert_eq!(second.loaded_count, 1);
        assert_eq!(second.entries[1].balance.unwrap().to_string(), "2.5");
        assert_eq!(second.total_balance.to_string(), "3.5");
        assert_eq!(store.current().loaded_count, 1);
    }

    #[tokio::test]
    async fn test_never_fetched_stays_unset() {
        let chain = ScriptedChain::default()
            .script(alice().parsed, &[Some(ONE_ETH)])
            .script(bob().parsed, &[None]);
        let (mut poller, _store) = poller(chain, &[alice(), bob()]);

        let snapshot = poller.poll_once().await;

        assert_eq!(snapshot.loaded_count, 1);
        assert!(snapshot.entries[1].balance.is_none());
        assert_eq!(snapshot.total_balance.to_string(), "1");
    }

    #[tokio::test]
    async fn test_all_failures_still_publish() {
        let (mut poller, store) = poller(ScriptedChain::default(), &[alice(), bob()]);

        let snapshot = poller.poll_once().await;

        assert_eq!(snapshot.cycle, 1);
        assert_eq!(snapshot.loaded_count, 0);
        assert_eq!(store.current().cycle, 1);
    }

    #[tokio::test]
    async fn test_loaded_count_resets_each_cycle() {
        let chain = ScriptedChain::default()
            .script(alice().parsed, &[Some(ONE_ETH), None, Some(ONE_ETH)])
            .script(bob().parsed, &[Some(ONE_ETH), None, None]);
        let (mut poller, _store) = poller(chain, &[alice(), bob()]);

        let counts: Vec<usize> = [
            poller.poll_once().await,
            poller.poll_once().await,
            poller.poll_once().await,
        ]
        .iter()
        .map(|s| {
            assert!(s.loaded_count <= s.total_count());
            s.loaded_count
        })
        .collect();

        assert_eq!(counts, vec![2, 0, 1]);
    }

    #[tokio::test]
    async fn test_visits_in_registry_order() {
        let chain = Arc::new(
            ScriptedChain::default()
                .script(alice().parsed, &[Some(1)])
                .script(bob().parsed, &[Some(2)]),
        );
        let registry = [bob(), alice(), bob()];
        let store = Arc::new(SnapshotStore::new(&registry));
        let mut poller = BalancePoller::new(chain.clone(), store, Duration::from_millis(10));

        poller.poll_once().await;

        let calls = chain.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![bob().parsed, alice().parsed, bob().parsed]);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let chain = ScriptedChain::default().script(alice().parsed, &[Some(ONE_ETH)]);
        let (poller, store) = poller(chain, &[alice()]);
        let (tx, rx) = broadcast::channel(1);

        let handle = tokio::spawn(poller.run(rx));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
        assert!(store.current().cycle >= 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_cycle_publishes_nothing() {
        let chain = ScriptedChain::default().script(alice().parsed, &[Some(ONE_ETH)]);
        let (poller, store) = poller(chain, &[alice()]);
        let (tx, rx) = broadcast::channel(1);
        tx.send(()).unwrap();

        poller.run(rx).await;

        assert_eq!(store.current().cycle, 0);
    }
}
