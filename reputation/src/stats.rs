//! Per-address aggregate over the event history.

use historia_adjudication::EventRecord;
use historia_types::{Address, Amount, EventStatus, Outcome, Vote};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Commitments made, including the proposer's own on each submit.
    pub total_votes: u64,
    /// Reveals on the winning side of a resolved, untied event.
    pub won_votes: u64,
    pub total_reveals: u64,
    /// Sum of locked stakes, raw units.
    pub total_staked: Amount,
    pub proposed_events: u64,
    /// `won_votes × 100 / total_votes`, truncated; 0 without votes.
    pub win_rate: u32,
}

impl UserStats {
    pub fn aggregate<'a>(
        address: &Address,
        records: impl IntoIterator<Item = &'a EventRecord>,
    ) -> Self {
        let mut stats = Self::default();
        let mut staked = Vec::new();
        for rec in records {
            if &rec.event.proposer == address {
                stats.proposed_events += 1;
            }
            let Some(c) = rec.commitment(address) else {
                continue;
            };
            stats.total_votes += 1;
            staked.push(c.stake_locked);
            let Some(vote) = c.revealed_vote else {
                continue;
            };
            stats.total_reveals += 1;
            if winning_vote(rec) == Some(vote) {
                stats.won_votes += 1;
            }
        }
        stats.total_staked = staked.into_iter().sum();
        stats.win_rate = win_rate(stats.won_votes, stats.total_votes);
        stats
    }
}

fn winning_vote(rec: &EventRecord) -> Option<Vote> {
    if rec.event.terminal != Some(EventStatus::Resolved) {
        return None;
    }
    match rec.event.outcome {
        Outcome::Accepted => Some(Vote::For),
        Outcome::Rejected => Some(Vote::Against),
        Outcome::Pending | Outcome::Tied => None,
    }
}

fn win_rate(won: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    // won ≤ total, so the quotient is at most 100.
    (u128::from(won) * 100 / u128::from(total)) as u32
}
