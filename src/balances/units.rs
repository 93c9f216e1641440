//! Exact ether amounts.
//!
//! Amounts are kept as integer wei in a `U256` and only turned into decimal
//! text when rendered, so conversion and summation never lose precision.

use alloy::primitives::U256;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Decimal places between wei and ether.
pub const ETHER_DECIMALS: usize = 18;

/// 10^18 wei.
const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// An exact, non-negative ether amount stored as wei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EtherAmount(U256);

impl EtherAmount {
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a smallest-unit amount.
    pub const fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    /// Exact addition, `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    fn split(&self) -> (U256, String) {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        (whole, format!("{:0>width$}", frac.to_string(), width = ETHER_DECIMALS))
    }

    /// Render with exactly `ETHER_DECIMALS` fractional digits.
    pub fn to_fixed_string(&self) -> String {
        let (whole, frac) = self.split();
        format!("{whole}.{frac}")
    }
}

/// Clamps at `U256::MAX` on overflow, with a warning.
impl Add for EtherAmount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(other).unwrap_or_else(|| {
            tracing::warn!(lhs = %self.0, rhs = %other.0, "Ether amount overflowed U256, clamping");
            Self(U256::MAX)
        })
    }
}

impl Sum for EtherAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Shortest exact form: trailing fractional zeros and a bare `.` are dropped.
impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.split();
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.{frac}")
        }
    }
}
