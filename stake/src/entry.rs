//! Locked stakes as seen by the payout engine.

use historia_types::{Address, Amount, Vote};
use serde::{Deserialize, Serialize};

/// One committer's locked stake and (if opened) their vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEntry {
    pub staker: Address,
    pub amount: Amount,
    /// `None` if the commitment was never revealed.
    pub revealed: Option<Vote>,
}

impl StakeEntry {
    pub fn new(staker: Address, amount: Amount, revealed: Option<Vote>) -> Self {
        Self {
            staker,
            amount,
            revealed,
        }
    }
}

/// What happened to a locked stake at resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeFate {
    Won,
    Lost,
    Refunded,
    Forfeited,
    Retained,
}

impl StakeFate {
    /// Whether the staker gets anything back.
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Won | Self::Refunded)
    }
}

/// Per-staker result of a settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeOutcome {
    pub staker: Address,
    pub staked: Amount,
    pub vote: Option<Vote>,
    pub fate: StakeFate,
    /// Total paid back to the staker (principal plus winnings).
    pub paid: Amount,
}

impl StakeOutcome {
    /// Paid amount beyond the staker's own principal.
    pub fn gain(&self) -> Amount {
        self.paid.saturating_sub(self.staked)
    }
}
