//! Events, commitments and their stored record.

use historia_stake::{Settlement, StakeEntry};
use historia_types::{
    Address, Amount, CommitHash, EventId, EventStatus, Outcome, Timestamp, Vote,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A claim under adjudication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub description: String,
    pub proposer: Address,
    /// Unit stake of every commitment, including the proposer's own.
    pub stake_amount: Amount,
    /// 1 for root events, `parent.version + 1` for contests.
    pub version: u32,
    pub parent_id: Option<EventId>,
    pub created_at: Timestamp,
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
    pub commit_count: u32,
    pub reveal_count: u32,
    /// Unknown until resolution.
    pub votes_for: Option<u32>,
    pub votes_against: Option<u32>,
    pub outcome: Outcome,
    /// Set only once the event reaches `Resolved` or `Voided`.
    pub terminal: Option<EventStatus>,
    pub resolved_at: Option<Timestamp>,
}

impl Event {
    /// Status as seen at `now`.
    ///
    /// A terminal status always wins. Otherwise the event is in `Commit`
    /// strictly before `commit_end` and in `Reveal` from then on, including
    /// after `reveal_end` while it waits for someone to resolve it.
    pub fn status_at(&self, now: Timestamp) -> EventStatus {
        match self.terminal {
            Some(status) => status,
            None if now < self.commit_end => EventStatus::Commit,
            None => EventStatus::Reveal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether the reveal window has elapsed on an unresolved event.
    pub fn is_due(&self, now: Timestamp) -> bool {
        !self.is_terminal() && now >= self.reveal_end
    }
}

/// One voter's hidden vote on one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub voter: Address,
    pub commit_hash: CommitHash,
    pub stake_locked: Amount,
    pub committed_at: Timestamp,
    pub revealed_vote: Option<Vote>,
    pub revealed_at: Option<Timestamp>,
}

impl Commitment {
    pub fn new(voter: Address, commit_hash: CommitHash, stake: Amount, now: Timestamp) -> Self {
        Self {
            voter,
            commit_hash,
            stake_locked: stake,
            committed_at: now,
            revealed_vote: None,
            revealed_at: None,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_vote.is_some()
    }
}

/// An event with all of its commitments and, once resolved, its settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: Event,
    pub commitments: BTreeMap<Address, Commitment>,
    pub settlement: Option<Settlement>,
}

impl EventRecord {
    pub fn id(&self) -> EventId {
        self.event.id
    }

    pub fn commitment(&self, voter: &Address) -> Option<&Commitment> {
        self.commitments.get(voter)
    }

    /// Total value locked by every committer.
    pub fn pool(&self) -> Amount {
        self.commitments.values().map(|c| c.stake_locked).sum()
    }

    /// Locked stakes in the shape the payout engine consumes.
    pub fn stake_entries(&self) -> Vec<StakeEntry> {
        self.commitments
            .values()
            .map(|c| StakeEntry::new(c.voter.clone(), c.stake_locked, c.revealed_vote))
            .collect()
    }
}
