//! Read-only view of an event for callers outside the engine.

use crate::event::EventRecord;
use historia_types::{Address, Amount, EventId, EventStatus, Outcome, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSnapshot {
    pub id: EventId,
    pub description: String,
    pub status: EventStatus,
    pub proposer: Address,
    pub stake: Amount,
    pub version: u32,
    pub parent_id: Option<EventId>,
    pub commit_count: u32,
    pub reveal_count: u32,
    pub votes_for: Option<u32>,
    pub votes_against: Option<u32>,
    pub outcome: Outcome,
    /// Sum of every locked stake.
    pub pool: Amount,
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
}

impl EventSnapshot {
    /// Snapshot `record` with its status evaluated at `now`.
    pub fn of(record: &EventRecord, now: Timestamp) -> Self {
        let e = &record.event;
        Self {
            id: e.id,
            description: e.description.clone(),
            status: e.status_at(now),
            proposer: e.proposer.clone(),
            stake: e.stake_amount,
            version: e.version,
            parent_id: e.parent_id,
            commit_count: e.commit_count,
            reveal_count: e.reveal_count,
            votes_for: e.votes_for,
            votes_against: e.votes_against,
            outcome: e.outcome,
            pool: record.pool(),
            commit_end: e.commit_end,
            reveal_end: e.reveal_end,
        }
    }

    /// Seconds until the current phase ends, if it has not ended yet.
    pub fn secs_remaining(&self, now: Timestamp) -> Option<u64> {
        let end = match self.status {
            EventStatus::Commit => self.commit_end,
            EventStatus::Reveal => self.reveal_end,
            EventStatus::Resolved | EventStatus::Voided => return None,
        };
        Some(end.secs_until(now)).filter(|s| *s > 0)
    }
}
