//! Watched address types.

use alloy::primitives::Address;
use std::fmt;

use crate::balances::units::EtherAmount;

/// One monitored address and its last observed balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedAddress {
    /// Display label from the registry file.
    pub name: String,
    /// The address exactly as written in the registry file.
    pub address: String,
    /// Parsed form used for RPC calls.
    pub parsed: Address,
    /// Last successfully fetched balance, `None` until the first success.
    pub balance: Option<EtherAmount>,
}

impl WatchedAddress {
    /// Create an entry with no balance yet.
    pub fn new(name: impl Into<String>, address: impl Into<String>, parsed: Address) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            parsed,
            balance: None,
        }
    }

    /// Balance with unset treated as zero.
    pub fn balance_or_zero(&self) -> EtherAmount {
        self.balance.unwrap_or(EtherAmount::ZERO)
    }
}

impl fmt::Display for WatchedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.address)
    }
}
