//! Shared utilities for integration testing.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use eth_balance_exporter::blockchain::{BlockchainError, BlockchainResult, ChainClient};

/// In-memory chain node.
///
/// Each address answers from its own queue of results; the last result
/// repeats once the queue is down to one. `None` means the fetch fails.
#[derive(Default)]
pub struct FakeChain {
    balances: Mutex<HashMap<Address, VecDeque<Option<U256>>>>,
    pub block: u64,
}

impl FakeChain {
    pub fn with_block(block: u64) -> Self {
        Self {
            block,
            ..Default::default()
        }
    }

    pub fn answers(self, address: Address, answers: &[Option<u128>]) -> Self {
        self.balances
            .lock()
            .unwrap()
            .insert(address, answers.iter().map(|a| a.map(U256::from)).collect());
        self
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        let mut balances = self.balances.lock().unwrap();
        let queue = balances
            .get_mut(&address)
            .ok_or_else(|| BlockchainError::Rpc(format!("no balance for {address}")))?;
        let answer = if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().copied().flatten()
        };
        answer.ok_or_else(|| BlockchainError::Rpc("fake node failure".to_string()))
    }

    async fn current_block(&self) -> BlockchainResult<u64> {
        Ok(self.block)
    }
}

/// Fetch `/metrics` from a running exporter.
#[allow(dead_code)]
pub async fn scrape(addr: std::net::SocketAddr) -> (u16, String) {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("exporter unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

/// Poll `check` until it returns `Some` or the deadline passes.
#[allow(dead_code)]
pub async fn eventually<T, F, Fut>(deadline: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if let Some(value) = check().await {
            return Some(value);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    None
}
