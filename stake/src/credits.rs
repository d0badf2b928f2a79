//! Withdrawable balances produced by settlements.

use crate::error::StakeError;
use crate::settlement::Settlement;
use historia_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-address credited balances.
///
/// A settlement credits each paid staker, the proposer fee to the proposer,
/// and platform fee plus platform remainder to the platform address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLedger {
    balances: BTreeMap<Address, Amount>,
}

impl CreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted balances.
    pub fn restore(balances: impl IntoIterator<Item = (Address, Amount)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
        }
    }

    pub fn balance(&self, addr: &Address) -> Amount {
        self.balances.get(addr).copied().unwrap_or(Amount::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum across all addresses.
    pub fn total(&self) -> Amount {
        self.balances.values().copied().sum()
    }

    /// The credits a settlement would produce, merged per address.
    pub fn credits_for(
        settlement: &Settlement,
        platform: &Address,
    ) -> Result<BTreeMap<Address, Amount>, StakeError> {
        let mut credits: BTreeMap<Address, Amount> = BTreeMap::new();
        let mut add = |addr: &Address, amount: Amount| -> Result<(), StakeError> {
            if amount.is_zero() {
                return Ok(());
            }
            let slot = credits.entry(addr.clone()).or_default();
            *slot = slot.checked_add(amount).ok_or(StakeError::Overflow)?;
            Ok(())
        };
        for s in &settlement.stakes {
            add(&s.staker, s.paid)?;
        }
        add(&settlement.proposer, settlement.fee.proposer)?;
        add(platform, settlement.fee.platform)?;
        add(platform, settlement.platform_remainder)?;
        Ok(credits)
    }

    /// Credit a settlement. Either every balance is updated or none is.
    ///
    /// Returns the updated balances of the touched addresses.
    pub fn apply(
        &mut self,
        settlement: &Settlement,
        platform: &Address,
    ) -> Result<Vec<(Address, Amount)>, StakeError> {
        let credits = Self::credits_for(settlement, platform)?;
        let mut updated = Vec::with_capacity(credits.len());
        for (addr, amount) in credits {
            let next = self
                .balance(&addr)
                .checked_add(amount)
                .ok_or(StakeError::Overflow)?;
            updated.push((addr, next));
        }
        for (addr, next) in &updated {
            self.balances.insert(addr.clone(), *next);
        }
        tracing::debug!(addresses = updated.len(), "credited settlement");
        Ok(updated)
    }
}
