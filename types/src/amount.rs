//! Value amounts in the ledger's smallest unit.
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! Conversion to the human display unit is a presentation concern.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// An amount of staked value, in raw base units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Raw units per whole display unit.
    pub const UNIT: u128 = 1_000_000;

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// `n` whole display units.
    pub const fn units(n: u128) -> Self {
        Self(n * Self::UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Whole display units, truncated.
    pub fn whole_units(&self) -> u128 {
        self.0 / Self::UNIT
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = TypesError;

    /// Parse a raw decimal amount, optionally suffixed with a denomination
    /// (`"1000000"` or `"1000000ugnot"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypesError::InvalidAmount(s.to_string()));
        }
        digits
            .parse::<u128>()
            .map(Self)
            .map_err(|_| TypesError::InvalidAmount(s.to_string()))
    }
}

/// Saturating sum, for display and aggregate statistics only.
/// Settlement arithmetic uses `checked_add`.
impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.fold(0u128, |acc, a| acc.saturating_add(a.0)))
    }
}
