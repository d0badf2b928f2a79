//! Phase rules of the event state machine.
//!
//! Each action is split into a `check_*` that inspects the record and a
//! matching `apply_*` that mutates it. Checks run in a fixed order
//! (terminal → phase → commitment state → stake or hash), so the same
//! invalid call always yields the same error.

use crate::error::AdjudicationError;
use crate::event::{Commitment, Event, EventRecord};
use historia_stake::{settle, void, Settlement, MAX_POOL};
use historia_types::{
    Address, Amount, CommitHash, EventId, EventStatus, Outcome, ProtocolParams, Timestamp, Vote,
};
use std::collections::BTreeMap;

/// Caller-supplied parameters of a new event, shared by submit and contest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub description: String,
    /// Unit stake that every voter must lock.
    pub stake: Amount,
    pub commit_minutes: u64,
    pub reveal_minutes: u64,
    /// The proposer's own commitment.
    pub commit_hash: CommitHash,
}

/// Result of a successful resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// At least one reveal; the pool was redistributed.
    Resolved(Settlement),
    /// Nobody revealed; every locked stake is retained.
    Voided(Settlement),
}

impl Resolution {
    pub fn settlement(&self) -> &Settlement {
        match self {
            Self::Resolved(s) | Self::Voided(s) => s,
        }
    }

    pub fn status(&self) -> EventStatus {
        match self {
            Self::Resolved(_) => EventStatus::Resolved,
            Self::Voided(_) => EventStatus::Voided,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.settlement().outcome
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Windows {
    pub commit_end: Timestamp,
    pub reveal_end: Timestamp,
}

/// Validate a new event: description, then stake, then windows.
pub(crate) fn check_proposal(
    p: &Proposal,
    attached: Amount,
    max_description_len: usize,
    params: &ProtocolParams,
    now: Timestamp,
) -> Result<Windows, AdjudicationError> {
    if p.description.trim().is_empty() {
        return Err(AdjudicationError::EmptyDescription);
    }
    let len = p.description.chars().count();
    if len > max_description_len {
        return Err(AdjudicationError::DescriptionTooLong {
            len,
            max: max_description_len,
        });
    }

    if p.stake < params.min_stake {
        return Err(AdjudicationError::InsufficientStake {
            needed: params.min_stake,
            provided: p.stake,
        });
    }
    if attached < p.stake {
        return Err(AdjudicationError::InsufficientStake {
            needed: p.stake,
            provided: attached,
        });
    }
    ensure_within_pool_limit(attached)?;

    let invalid = || AdjudicationError::InvalidDuration {
        commit_minutes: p.commit_minutes,
        reveal_minutes: p.reveal_minutes,
    };
    if p.commit_minutes < params.min_phase_minutes || p.reveal_minutes < params.min_phase_minutes
    {
        return Err(invalid());
    }
    let total = p.commit_minutes.checked_add(p.reveal_minutes).ok_or_else(invalid)?;
    if total > params.max_total_minutes {
        return Err(invalid());
    }

    let commit_end = now
        .plus_minutes(p.commit_minutes)
        .ok_or(AdjudicationError::Overflow)?;
    let reveal_end = commit_end
        .plus_minutes(p.reveal_minutes)
        .ok_or(AdjudicationError::Overflow)?;
    Ok(Windows {
        commit_end,
        reveal_end,
    })
}

/// Build a fresh record whose only commitment is the proposer's.
pub(crate) fn open_event(
    id: EventId,
    proposer: &Address,
    p: Proposal,
    attached: Amount,
    lineage: (u32, Option<EventId>),
    windows: Windows,
    now: Timestamp,
) -> EventRecord {
    let (version, parent_id) = lineage;
    let mut commitments = BTreeMap::new();
    commitments.insert(
        proposer.clone(),
        Commitment::new(proposer.clone(), p.commit_hash, attached, now),
    );
    EventRecord {
        event: Event {
            id,
            description: p.description,
            proposer: proposer.clone(),
            stake_amount: p.stake,
            version,
            parent_id,
            created_at: now,
            commit_end: windows.commit_end,
            reveal_end: windows.reveal_end,
            commit_count: 1,
            reveal_count: 0,
            votes_for: None,
            votes_against: None,
            outcome: Outcome::Pending,
            terminal: None,
            resolved_at: None,
        },
        commitments,
        settlement: None,
    }
}

fn ensure_not_terminal(rec: &EventRecord) -> Result<(), AdjudicationError> {
    match rec.event.terminal {
        Some(status) => Err(AdjudicationError::AlreadyResolved(rec.id(), status)),
        None => Ok(()),
    }
}

fn wrong_phase(rec: &EventRecord, now: Timestamp, action: &'static str) -> AdjudicationError {
    AdjudicationError::WrongPhase {
        event: rec.id(),
        status: rec.event.status_at(now),
        action,
    }
}

pub(crate) fn check_commit(
    rec: &EventRecord,
    voter: &Address,
    attached: Amount,
    now: Timestamp,
) -> Result<(), AdjudicationError> {
    ensure_not_terminal(rec)?;
    if rec.event.status_at(now) != EventStatus::Commit {
        return Err(wrong_phase(rec, now, "commit"));
    }
    if rec.commitments.contains_key(voter) {
        return Err(AdjudicationError::AlreadyCommitted {
            event: rec.id(),
            voter: voter.to_string(),
        });
    }
    if attached < rec.event.stake_amount {
        return Err(AdjudicationError::InsufficientStake {
            needed: rec.event.stake_amount,
            provided: attached,
        });
    }
    rec.event
        .commit_count
        .checked_add(1)
        .ok_or(AdjudicationError::Overflow)?;
    let pool = locked_total(rec)?
        .checked_add(attached)
        .ok_or(AdjudicationError::Overflow)?;
    ensure_within_pool_limit(pool)?;
    Ok(())
}

fn ensure_within_pool_limit(pool: Amount) -> Result<(), AdjudicationError> {
    if pool > MAX_POOL {
        return Err(AdjudicationError::PoolLimit {
            pool,
            limit: MAX_POOL,
        });
    }
    Ok(())
}

pub(crate) fn apply_commit(
    rec: &mut EventRecord,
    voter: &Address,
    commit_hash: CommitHash,
    attached: Amount,
    now: Timestamp,
) {
    rec.commitments.insert(
        voter.clone(),
        Commitment::new(voter.clone(), commit_hash, attached, now),
    );
    rec.event.commit_count += 1;
}

pub(crate) fn check_reveal(
    rec: &EventRecord,
    voter: &Address,
    vote: Vote,
    secret: &str,
    now: Timestamp,
) -> Result<(), AdjudicationError> {
    ensure_not_terminal(rec)?;
    if rec.event.status_at(now) != EventStatus::Reveal || now >= rec.event.reveal_end {
        return Err(wrong_phase(rec, now, "reveal"));
    }
    let commitment = rec
        .commitment(voter)
        .ok_or_else(|| AdjudicationError::NoCommitment {
            event: rec.id(),
            voter: voter.to_string(),
        })?;
    if commitment.is_revealed() {
        return Err(AdjudicationError::AlreadyRevealed {
            event: rec.id(),
            voter: voter.to_string(),
        });
    }
    if !historia_crypto::verify(voter, vote, secret, &commitment.commit_hash) {
        return Err(AdjudicationError::HashMismatch {
            event: rec.id(),
            voter: voter.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn apply_reveal(rec: &mut EventRecord, voter: &Address, vote: Vote, now: Timestamp) {
    if let Some(c) = rec.commitments.get_mut(voter) {
        c.revealed_vote = Some(vote);
        c.revealed_at = Some(now);
        rec.event.reveal_count += 1;
    }
}

/// Compute the resolution without touching the record.
pub(crate) fn check_resolve(
    rec: &EventRecord,
    params: &ProtocolParams,
    now: Timestamp,
) -> Result<Resolution, AdjudicationError> {
    ensure_not_terminal(rec)?;
    if now < rec.event.reveal_end {
        return Err(wrong_phase(rec, now, "resolve"));
    }
    let entries = rec.stake_entries();
    if rec.event.reveal_count == 0 {
        return Ok(Resolution::Voided(void(&rec.event.proposer, &entries)?));
    }
    Ok(Resolution::Resolved(settle(
        &rec.event.proposer,
        &entries,
        params,
    )?))
}

pub(crate) fn apply_resolution(rec: &mut EventRecord, resolution: &Resolution, now: Timestamp) {
    let settlement = resolution.settlement();
    if let Resolution::Resolved(_) = resolution {
        rec.event.votes_for = Some(settlement.votes_for);
        rec.event.votes_against = Some(settlement.votes_against);
    }
    rec.event.outcome = settlement.outcome;
    rec.event.terminal = Some(resolution.status());
    rec.event.resolved_at = Some(now);
    rec.settlement = Some(settlement.clone());
}

fn locked_total(rec: &EventRecord) -> Result<Amount, AdjudicationError> {
    rec.commitments
        .values()
        .try_fold(Amount::ZERO, |acc, c| acc.checked_add(c.stake_locked))
        .ok_or(AdjudicationError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use historia_crypto::commit;

    const T0: u64 = 1_700_000_000;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn proposal(description: &str, commit_minutes: u64, reveal_minutes: u64) -> Proposal {
        Proposal {
            description: description.to_string(),
            stake: Amount::units(1),
            commit_minutes,
            reveal_minutes,
            commit_hash: commit(&addr("alice"), Vote::For, "s-alice"),
        }
    }

    fn check(p: &Proposal) -> Result<Windows, AdjudicationError> {
        check_proposal(
            p,
            p.stake,
            280,
            &ProtocolParams::default(),
            Timestamp::new(T0),
        )
    }

    fn record() -> EventRecord {
        let p = proposal("Water boils at 100C at sea level", 10, 10);
        let w = check(&p).unwrap();
        open_event(
            EventId::FIRST,
            &addr("alice"),
            p,
            Amount::units(1),
            (1, None),
            w,
            Timestamp::new(T0),
        )
    }

    #[test]
    fn windows_are_derived_from_minutes() {
        let w = check(&proposal("claim", 5, 7)).unwrap();
        assert_eq!(w.commit_end, Timestamp::new(T0 + 300));
        assert_eq!(w.reveal_end, Timestamp::new(T0 + 720));
    }

    #[test]
    fn rejects_zero_minute_windows() {
        let err = check(&proposal("claim", 0, 10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);
        let err = check(&proposal("claim", 10, 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);
    }

    #[test]
    fn thirty_day_ceiling_is_inclusive() {
        assert!(check(&proposal("claim", 43_199, 1)).is_ok());
        let err = check(&proposal("claim", 43_200, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);
        let err = check(&proposal("claim", u64::MAX, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDuration);
    }

    #[test]
    fn description_limits_count_characters() {
        let exact: String = "é".repeat(280);
        assert!(check(&proposal(&exact, 1, 1)).is_ok());
        let long: String = "é".repeat(281);
        assert_eq!(
            check(&proposal(&long, 1, 1)),
            Err(AdjudicationError::DescriptionTooLong { len: 281, max: 280 })
        );
        assert_eq!(
            check(&proposal("   ", 1, 1)),
            Err(AdjudicationError::EmptyDescription)
        );
    }

    #[test]
    fn stake_floor_and_attached_value() {
        let mut p = proposal("claim", 1, 1);
        p.stake = Amount::new(999_999);
        assert_eq!(check(&p).unwrap_err().kind(), ErrorKind::InsufficientStake);

        let p = proposal("claim", 1, 1);
        let err = check_proposal(
            &p,
            Amount::new(500_000),
            280,
            &ProtocolParams::default(),
            Timestamp::new(T0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AdjudicationError::InsufficientStake {
                needed: Amount::units(1),
                provided: Amount::new(500_000),
            }
        );
    }

    #[test]
    fn description_checked_before_stake() {
        let mut p = proposal("", 0, 0);
        p.stake = Amount::ZERO;
        assert_eq!(check(&p), Err(AdjudicationError::EmptyDescription));
    }

    #[test]
    fn opened_event_holds_proposer_commitment() {
        let rec = record();
        assert_eq!(rec.event.commit_count, 1);
        assert_eq!(rec.event.version, 1);
        assert_eq!(rec.pool(), Amount::units(1));
        assert!(rec.commitment(&addr("alice")).is_some());
        assert_eq!(rec.event.votes_for, None);
    }

    #[test]
    fn commit_closes_at_commit_end() {
        let rec = record();
        let last = Timestamp::new(T0 + 599);
        assert!(check_commit(&rec, &addr("bob"), Amount::units(1), last).is_ok());
        let err = check_commit(&rec, &addr("bob"), Amount::units(1), Timestamp::new(T0 + 600))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongPhase);
    }

    #[test]
    fn phase_checked_before_duplicate_commit() {
        let rec = record();
        let late = Timestamp::new(T0 + 700);
        let err = check_commit(&rec, &addr("alice"), Amount::ZERO, late).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongPhase);
        let err =
            check_commit(&rec, &addr("alice"), Amount::ZERO, Timestamp::new(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyCommitted);
    }

    #[test]
    fn reveal_window_is_half_open() {
        let mut rec = record();
        let bob = addr("bob");
        let hash = commit(&bob, Vote::Against, "s-bob");
        apply_commit(&mut rec, &bob, hash, Amount::units(1), Timestamp::new(T0));

        let before = Timestamp::new(T0 + 599);
        let opens = Timestamp::new(T0 + 600);
        let closes = Timestamp::new(T0 + 1_200);
        let kind = |t| {
            check_reveal(&rec, &bob, Vote::Against, "s-bob", t)
                .err()
                .map(|e| e.kind())
        };
        assert_eq!(kind(before), Some(ErrorKind::WrongPhase));
        assert_eq!(kind(opens), None);
        assert_eq!(kind(closes), Some(ErrorKind::WrongPhase));
    }

    #[test]
    fn reveal_requires_matching_hash() {
        let rec = record();
        let t = Timestamp::new(T0 + 600);
        let alice = addr("alice");
        assert_eq!(
            check_reveal(&rec, &alice, Vote::Against, "s-alice", t)
                .unwrap_err()
                .kind(),
            ErrorKind::HashMismatch
        );
        assert_eq!(
            check_reveal(&rec, &alice, Vote::For, "wrong", t)
                .unwrap_err()
                .kind(),
            ErrorKind::HashMismatch
        );
        assert_eq!(
            check_reveal(&rec, &addr("mallory"), Vote::For, "s-alice", t)
                .unwrap_err()
                .kind(),
            ErrorKind::NoCommitment
        );
    }

    #[test]
    fn resolve_waits_for_reveal_end() {
        let rec = record();
        let params = ProtocolParams::default();
        let err = check_resolve(&rec, &params, Timestamp::new(T0 + 1_199)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongPhase);
        assert!(check_resolve(&rec, &params, Timestamp::new(T0 + 1_200)).is_ok());
    }

    #[test]
    fn unrevealed_event_is_voided() {
        let mut rec = record();
        let now = Timestamp::new(T0 + 1_200);
        let res = check_resolve(&rec, &ProtocolParams::default(), now).unwrap();
        assert_eq!(res.status(), EventStatus::Voided);
        apply_resolution(&mut rec, &res, now);

        assert_eq!(rec.event.status_at(now), EventStatus::Voided);
        assert_eq!(rec.event.outcome, Outcome::Pending);
        assert_eq!(rec.event.votes_for, None);
        assert_eq!(
            rec.settlement.as_ref().unwrap().platform_remainder,
            Amount::units(1)
        );
        let err = check_resolve(&rec, &ProtocolParams::default(), now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyResolved);
    }
}
