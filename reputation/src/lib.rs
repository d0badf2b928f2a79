//! Participant reputation.
//!
//! [`UserStats`] aggregates one address's history over every event record;
//! [`score`] maps that history to a bounded 0–10 score. Neither has any
//! effect on protocol state.

pub mod score;
pub mod stats;

pub use score::{label, score, ProposalSummary, ScoreLabel};
pub use stats::UserStats;

use historia_adjudication::EventRecord;
use historia_types::{Address, Amount};
use serde::{Deserialize, Serialize};

/// Stats, score and label of one address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reputation {
    pub stats: UserStats,
    pub score: f64,
    pub label: ScoreLabel,
}

impl Reputation {
    pub fn for_address<'a>(
        address: &Address,
        records: impl IntoIterator<Item = &'a EventRecord>,
    ) -> Self {
        let records: Vec<&EventRecord> = records.into_iter().collect();
        let stats = UserStats::aggregate(address, records.iter().copied());
        let proposals: Vec<ProposalSummary> = records
            .iter()
            .filter(|r| &r.event.proposer == address)
            .map(|r| ProposalSummary::from(&r.event))
            .collect();
        let value = score(
            f64::from(stats.win_rate),
            stats.total_votes,
            display_units(stats.total_staked),
            &proposals,
        );
        Self {
            stats,
            score: value,
            label: label(value),
        }
    }
}

/// Raw amount in display units, fractional part kept.
fn display_units(amount: Amount) -> f64 {
    amount.raw() as f64 / Amount::UNIT as f64
}
