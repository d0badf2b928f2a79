//! Resolution-time settlement of an event's stake pool.

use crate::entry::{StakeEntry, StakeFate, StakeOutcome};
use crate::error::StakeError;
use crate::fees::FeeSplit;
use historia_types::{Address, Amount, Outcome, ProtocolParams, Vote};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Largest stake pool one event may lock. Keeping pools within 64 bits keeps
/// `distributable × stake` within `u128`, so settlement cannot overflow.
pub const MAX_POOL: Amount = Amount::new(u64::MAX as u128);

/// The full accounting of one event's resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// `Pending` for a voided event.
    pub outcome: Outcome,
    pub votes_for: u32,
    pub votes_against: u32,
    pub total_locked: Amount,
    /// Stakes of the minority revealers.
    pub losing_pool: Amount,
    pub proposer: Address,
    pub fee: FeeSplit,
    /// `losing_pool − fee`, shared among winners.
    pub distributable: Amount,
    /// Non-revealer stakes plus rounding dust.
    pub platform_remainder: Amount,
    /// One entry per committer, in input order.
    pub stakes: Vec<StakeOutcome>,
}

impl Settlement {
    /// Sum of everything paid back to stakers.
    pub fn total_paid(&self) -> Option<Amount> {
        self.stakes
            .iter()
            .try_fold(Amount::ZERO, |acc, s| acc.checked_add(s.paid))
    }

    /// `Σ locked = Σ payouts + fees + platform remainder`, exactly.
    pub fn is_conserved(&self) -> bool {
        let out = self
            .total_paid()
            .and_then(|p| p.checked_add(self.fee.proposer))
            .and_then(|p| p.checked_add(self.fee.platform))
            .and_then(|p| p.checked_add(self.platform_remainder));
        out == Some(self.total_locked)
    }

    /// Outcome for a single staker, if they committed.
    pub fn stake_of(&self, staker: &Address) -> Option<&StakeOutcome> {
        self.stakes.iter().find(|s| &s.staker == staker)
    }

    /// The winning vote, if the event was decided.
    pub fn winning_vote(&self) -> Option<Vote> {
        match self.outcome {
            Outcome::Accepted => Some(Vote::For),
            Outcome::Rejected => Some(Vote::Against),
            Outcome::Pending | Outcome::Tied => None,
        }
    }
}

/// Settle a resolved event.
///
/// `entries` are all commitments of the event. At least one must be revealed;
/// events without reveals go through [`void`].
pub fn settle(
    proposer: &Address,
    entries: &[StakeEntry],
    params: &ProtocolParams,
) -> Result<Settlement, StakeError> {
    ensure_unique(entries)?;
    let total_locked = sum(entries.iter().map(|e| e.amount))?;

    let votes_for = count(entries, Vote::For);
    let votes_against = count(entries, Vote::Against);
    if votes_for == 0 && votes_against == 0 {
        return Err(StakeError::NoRevealers);
    }

    let forfeited = sum(
        entries
            .iter()
            .filter(|e| e.revealed.is_none())
            .map(|e| e.amount),
    )?;

    if votes_for == votes_against {
        let stakes = entries
            .iter()
            .map(|e| match e.revealed {
                Some(_) => outcome(e, StakeFate::Refunded, e.amount),
                None => outcome(e, StakeFate::Forfeited, Amount::ZERO),
            })
            .collect();
        return Ok(Settlement {
            outcome: Outcome::Tied,
            votes_for,
            votes_against,
            total_locked,
            losing_pool: Amount::ZERO,
            proposer: proposer.clone(),
            fee: FeeSplit::default(),
            distributable: Amount::ZERO,
            platform_remainder: forfeited,
            stakes,
        });
    }

    let (winner, result) = if votes_for > votes_against {
        (Vote::For, Outcome::Accepted)
    } else {
        (Vote::Against, Outcome::Rejected)
    };

    let losing_pool = sum(
        entries
            .iter()
            .filter(|e| e.revealed.is_some_and(|v| v != winner))
            .map(|e| e.amount),
    )?;
    let winning_pool = sum(
        entries
            .iter()
            .filter(|e| e.revealed == Some(winner))
            .map(|e| e.amount),
    )?;

    let fee = FeeSplit::compute(losing_pool, params)?;
    let distributable = losing_pool
        .checked_sub(fee.total()?)
        .ok_or(StakeError::Overflow)?;

    let mut distributed = Amount::ZERO;
    let mut stakes = Vec::with_capacity(entries.len());
    for e in entries {
        let so = match e.revealed {
            Some(v) if v == winner => {
                let share = proportional_share(distributable, e.amount, winning_pool)?;
                distributed = distributed.checked_add(share).ok_or(StakeError::Overflow)?;
                let paid = e.amount.checked_add(share).ok_or(StakeError::Overflow)?;
                outcome(e, StakeFate::Won, paid)
            }
            Some(_) => outcome(e, StakeFate::Lost, Amount::ZERO),
            None => outcome(e, StakeFate::Forfeited, Amount::ZERO),
        };
        stakes.push(so);
    }

    let dust = distributable
        .checked_sub(distributed)
        .ok_or(StakeError::Overflow)?;
    let platform_remainder = forfeited.checked_add(dust).ok_or(StakeError::Overflow)?;

    tracing::debug!(
        %proposer,
        outcome = %result,
        losing_pool = %losing_pool,
        distributable = %distributable,
        dust = %dust,
        "settled stake pool"
    );

    Ok(Settlement {
        outcome: result,
        votes_for,
        votes_against,
        total_locked,
        losing_pool,
        proposer: proposer.clone(),
        fee,
        distributable,
        platform_remainder,
        stakes,
    })
}

/// Settle a voided event: nothing is distributed, every stake is retained.
pub fn void(proposer: &Address, entries: &[StakeEntry]) -> Result<Settlement, StakeError> {
    ensure_unique(entries)?;
    let total_locked = sum(entries.iter().map(|e| e.amount))?;
    Ok(Settlement {
        outcome: Outcome::Pending,
        votes_for: 0,
        votes_against: 0,
        total_locked,
        losing_pool: Amount::ZERO,
        proposer: proposer.clone(),
        fee: FeeSplit::default(),
        distributable: Amount::ZERO,
        platform_remainder: total_locked,
        stakes: entries
            .iter()
            .map(|e| outcome(e, StakeFate::Retained, Amount::ZERO))
            .collect(),
    })
}

/// `distributable × stake / winning_pool`, rounded down.
fn proportional_share(
    distributable: Amount,
    stake: Amount,
    winning_pool: Amount,
) -> Result<Amount, StakeError> {
    if winning_pool.is_zero() {
        return Ok(Amount::ZERO);
    }
    distributable
        .raw()
        .checked_mul(stake.raw())
        .map(|v| Amount::new(v / winning_pool.raw()))
        .ok_or(StakeError::Overflow)
}

fn outcome(e: &StakeEntry, fate: StakeFate, paid: Amount) -> StakeOutcome {
    StakeOutcome {
        staker: e.staker.clone(),
        staked: e.amount,
        vote: e.revealed,
        fate,
        paid,
    }
}

fn count(entries: &[StakeEntry], vote: Vote) -> u32 {
    entries.iter().filter(|e| e.revealed == Some(vote)).count() as u32
}

fn sum(mut amounts: impl Iterator<Item = Amount>) -> Result<Amount, StakeError> {
    amounts.try_fold(Amount::ZERO, |acc, a| {
        acc.checked_add(a).ok_or(StakeError::Overflow)
    })
}

fn ensure_unique(entries: &[StakeEntry]) -> Result<(), StakeError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for e in entries {
        if !seen.insert(&e.staker) {
            return Err(StakeError::DuplicateStaker(e.staker.to_string()));
        }
    }
    Ok(())
}
