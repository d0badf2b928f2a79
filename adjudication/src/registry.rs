//! The set of all events and the entry points of every protocol action.

use crate::contest::{check_contestable, ContestRequest};
use crate::error::AdjudicationError;
use crate::event::EventRecord;
use crate::genealogy::GenealogyIndex;
use crate::lifecycle::{self, Proposal, Resolution};
use crate::snapshot::EventSnapshot;
use historia_types::{Address, Amount, CommitHash, EventId, ProtocolParams, Timestamp, Vote};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What an accepted action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Submitted,
    Contested { parent: EventId },
    Committed { voter: Address, stake: Amount },
    Revealed { voter: Address, vote: Vote },
    Resolved(Resolution),
}

/// The state needed to take back one accepted action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Undo {
    event: EventId,
    prior: Option<EventRecord>,
    next_id: EventId,
}

/// An accepted action: the event it touched, its effect and how to undo it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub event: EventId,
    pub effect: Effect,
    pub undo: Undo,
}

impl Transition {
    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.effect {
            Effect::Resolved(r) => Some(r),
            _ => None,
        }
    }
}

/// All events, keyed by id, plus the contest index.
#[derive(Clone, Debug)]
pub struct EventRegistry {
    params: ProtocolParams,
    records: BTreeMap<EventId, EventRecord>,
    next_id: EventId,
    genealogy: GenealogyIndex,
}

impl EventRegistry {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params,
            records: BTreeMap::new(),
            next_id: EventId::FIRST,
            genealogy: GenealogyIndex::new(),
        }
    }

    /// Rebuild from persisted records.
    pub fn restore(params: ProtocolParams, records: impl IntoIterator<Item = EventRecord>) -> Self {
        let records: BTreeMap<_, _> = records.into_iter().map(|r| (r.id(), r)).collect();
        let next_id = records
            .keys()
            .next_back()
            .and_then(EventId::next)
            .unwrap_or(EventId::FIRST);
        let genealogy = GenealogyIndex::from_links(
            records
                .values()
                .filter_map(|r| r.event.parent_id.map(|p| (r.id(), p))),
        );
        Self {
            params,
            records,
            next_id,
            genealogy,
        }
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn get(&self, id: EventId) -> Option<&EventRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The id the next submit or contest will receive.
    pub fn next_id(&self) -> EventId {
        self.next_id
    }

    pub fn genealogy(&self) -> &GenealogyIndex {
        &self.genealogy
    }

    /// Create a root event with the proposer's own commitment.
    pub fn submit(
        &mut self,
        proposer: &Address,
        proposal: Proposal,
        attached: Amount,
        now: Timestamp,
    ) -> Result<Transition, AdjudicationError> {
        let max = self.params.max_description_len;
        self.open(proposer, proposal, attached, (1, None), max, now)
            .inspect_err(|e| debug!(%proposer, error = %e, "submit rejected"))
    }

    /// Create a new version of a terminal event, with the contester's commitment.
    pub fn contest(
        &mut self,
        contester: &Address,
        request: ContestRequest,
        attached: Amount,
        now: Timestamp,
    ) -> Result<Transition, AdjudicationError> {
        let parent = request.parent;
        let lineage = check_contestable(parent, self.records.get(&parent))
            .inspect_err(|e| debug!(%contester, %parent, error = %e, "contest rejected"))?;
        let max = self.params.max_contest_description_len;
        self.open(contester, request.proposal, attached, lineage, max, now)
            .inspect_err(|e| debug!(%contester, %parent, error = %e, "contest rejected"))
    }

    fn open(
        &mut self,
        proposer: &Address,
        proposal: Proposal,
        attached: Amount,
        lineage: (u32, Option<EventId>),
        max_description_len: usize,
        now: Timestamp,
    ) -> Result<Transition, AdjudicationError> {
        let windows =
            lifecycle::check_proposal(&proposal, attached, max_description_len, &self.params, now)?;
        let id = self.next_id;
        let following = id.next().ok_or(AdjudicationError::Overflow)?;

        let record = lifecycle::open_event(id, proposer, proposal, attached, lineage, windows, now);
        let undo = Undo {
            event: id,
            prior: None,
            next_id: id,
        };
        let (version, parent) = lineage;
        self.records.insert(id, record);
        self.next_id = following;

        let effect = match parent {
            Some(parent) => {
                self.genealogy.link(parent, id);
                info!(event = %id, %parent, version, %proposer, "contest opened");
                Effect::Contested { parent }
            }
            None => {
                info!(event = %id, %proposer, stake = %attached, "event submitted");
                Effect::Submitted
            }
        };
        Ok(Transition {
            event: id,
            effect,
            undo,
        })
    }

    /// Lock `attached` behind a hidden vote.
    pub fn commit_vote(
        &mut self,
        id: EventId,
        voter: &Address,
        commit_hash: CommitHash,
        attached: Amount,
        now: Timestamp,
    ) -> Result<Transition, AdjudicationError> {
        let rec = self.existing(id)?;
        lifecycle::check_commit(rec, voter, attached, now)
            .inspect_err(|e| debug!(event = %id, %voter, error = %e, "commit rejected"))?;
        let undo = self.undo_for(id);
        if let Some(rec) = self.records.get_mut(&id) {
            lifecycle::apply_commit(rec, voter, commit_hash, attached, now);
        }
        info!(event = %id, %voter, stake = %attached, "vote committed");
        Ok(Transition {
            event: id,
            effect: Effect::Committed {
                voter: voter.clone(),
                stake: attached,
            },
            undo,
        })
    }

    /// Open a previously committed vote.
    pub fn reveal_vote(
        &mut self,
        id: EventId,
        voter: &Address,
        vote: Vote,
        secret: &str,
        now: Timestamp,
    ) -> Result<Transition, AdjudicationError> {
        let rec = self.existing(id)?;
        lifecycle::check_reveal(rec, voter, vote, secret, now)
            .inspect_err(|e| debug!(event = %id, %voter, error = %e, "reveal rejected"))?;
        let undo = self.undo_for(id);
        if let Some(rec) = self.records.get_mut(&id) {
            lifecycle::apply_reveal(rec, voter, vote, now);
        }
        info!(event = %id, %voter, %vote, "vote revealed");
        Ok(Transition {
            event: id,
            effect: Effect::Revealed {
                voter: voter.clone(),
                vote,
            },
            undo,
        })
    }

    /// Tally and settle an event whose reveal window has elapsed.
    ///
    /// Anyone may call this. An event without reveals is voided rather
    /// than rejected.
    pub fn resolve(&mut self, id: EventId, now: Timestamp) -> Result<Transition, AdjudicationError> {
        let rec = self.existing(id)?;
        let resolution = lifecycle::check_resolve(rec, &self.params, now)
            .inspect_err(|e| debug!(event = %id, error = %e, "resolve rejected"))?;
        let undo = self.undo_for(id);
        if let Some(rec) = self.records.get_mut(&id) {
            lifecycle::apply_resolution(rec, &resolution, now);
        }
        let s = resolution.settlement();
        info!(
            event = %id,
            status = %resolution.status(),
            outcome = %s.outcome,
            votes_for = s.votes_for,
            votes_against = s.votes_against,
            losing_pool = %s.losing_pool,
            "event resolved"
        );
        Ok(Transition {
            event: id,
            effect: Effect::Resolved(resolution),
            undo,
        })
    }

    /// Take back an accepted action. Only valid for the most recent one.
    pub fn rollback(&mut self, undo: Undo) {
        match undo.prior {
            Some(prior) => {
                self.records.insert(undo.event, prior);
            }
            None => {
                self.records.remove(&undo.event);
                self.genealogy.unlink(undo.event);
            }
        }
        self.next_id = undo.next_id;
    }

    pub fn snapshot(&self, id: EventId, now: Timestamp) -> Option<EventSnapshot> {
        self.records.get(&id).map(|r| EventSnapshot::of(r, now))
    }

    pub fn snapshots(&self, now: Timestamp) -> Vec<EventSnapshot> {
        self.records
            .values()
            .map(|r| EventSnapshot::of(r, now))
            .collect()
    }

    /// Unresolved events whose reveal window has elapsed.
    pub fn due_for_resolution(&self, now: Timestamp) -> Vec<EventId> {
        self.records
            .values()
            .filter(|r| r.event.is_due(now))
            .map(EventRecord::id)
            .collect()
    }

    /// Events not yet terminal.
    pub fn open_count(&self) -> usize {
        self.records
            .values()
            .filter(|r| !r.event.is_terminal())
            .count()
    }

    /// `id` and its ancestors, newest first.
    pub fn lineage(&self, id: EventId) -> Result<Vec<EventId>, AdjudicationError> {
        self.existing(id)?;
        Ok(self.genealogy.lineage(id))
    }

    fn existing(&self, id: EventId) -> Result<&EventRecord, AdjudicationError> {
        self.records.get(&id).ok_or_else(|| {
            debug!(event = %id, "unknown event");
            AdjudicationError::EventNotFound(id)
        })
    }

    fn undo_for(&self, id: EventId) -> Undo {
        Undo {
            event: id,
            prior: self.records.get(&id).cloned(),
            next_id: self.next_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use historia_crypto::commit;
    use historia_stake::StakeFate;
    use historia_types::{EventStatus, Outcome};

    const T0: u64 = 1_700_000_000;
    const COMMIT_END: u64 = T0 + 600;
    const REVEAL_END: u64 = T0 + 1_200;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    fn secret(voter: &str) -> String {
        format!("secret-of-{voter}")
    }

    fn hash(voter: &str, vote: Vote) -> CommitHash {
        commit(&addr(voter), vote, &secret(voter))
    }

    fn proposal(proposer: &str, vote: Vote) -> Proposal {
        Proposal {
            description: "The Eiffel Tower was completed in 1889".into(),
            stake: Amount::units(1),
            commit_minutes: 10,
            reveal_minutes: 10,
            commit_hash: hash(proposer, vote),
        }
    }

    fn registry() -> EventRegistry {
        EventRegistry::new(ProtocolParams::default())
    }

    /// Submit by alice, then commit each `(voter, vote)`.
    fn event_with(reg: &mut EventRegistry, alice_vote: Vote, voters: &[(&str, Vote)]) -> EventId {
        let id = reg
            .submit(&addr("alice"), proposal("alice", alice_vote), Amount::units(1), at(T0))
            .unwrap()
            .event;
        for (voter, vote) in voters {
            reg.commit_vote(id, &addr(voter), hash(voter, *vote), Amount::units(1), at(T0 + 1))
                .unwrap();
        }
        id
    }

    fn reveal(reg: &mut EventRegistry, id: EventId, voter: &str, vote: Vote) {
        reg.reveal_vote(id, &addr(voter), vote, &secret(voter), at(COMMIT_END))
            .unwrap();
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut reg = registry();
        let a = event_with(&mut reg, Vote::For, &[]);
        let b = event_with(&mut reg, Vote::For, &[]);
        assert_eq!(a, EventId::FIRST);
        assert_eq!(b, EventId::new(2));
        assert_eq!(reg.next_id(), EventId::new(3));
    }

    #[test]
    fn two_for_one_against_settles_proportionally() {
        let mut reg = registry();
        let id = event_with(
            &mut reg,
            Vote::For,
            &[("bob", Vote::For), ("carol", Vote::Against)],
        );
        reveal(&mut reg, id, "alice", Vote::For);
        reveal(&mut reg, id, "bob", Vote::For);
        reveal(&mut reg, id, "carol", Vote::Against);

        let t = reg.resolve(id, at(REVEAL_END)).unwrap();
        let s = t.resolution().unwrap().settlement().clone();
        assert_eq!(s.outcome, Outcome::Accepted);
        assert_eq!(s.fee.total().unwrap(), Amount::new(20_000));
        assert_eq!(s.stake_of(&addr("bob")).unwrap().paid, Amount::new(1_490_000));
        assert_eq!(s.stake_of(&addr("alice")).unwrap().paid, Amount::new(1_490_000));
        assert_eq!(s.stake_of(&addr("carol")).unwrap().fate, StakeFate::Lost);

        let e = &reg.get(id).unwrap().event;
        assert_eq!(e.status_at(at(REVEAL_END)), EventStatus::Resolved);
        assert_eq!(e.votes_for, Some(2));
        assert_eq!(e.votes_against, Some(1));
        assert_eq!(e.reveal_count, 3);
    }

    #[test]
    fn nobody_revealed_voids_the_event() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[("bob", Vote::Against)]);
        let t = reg.resolve(id, at(REVEAL_END)).unwrap();
        assert!(matches!(t.effect, Effect::Resolved(Resolution::Voided(_))));

        let snap = reg.snapshot(id, at(REVEAL_END)).unwrap();
        assert_eq!(snap.status, EventStatus::Voided);
        assert_eq!(snap.outcome, Outcome::Pending);
        assert_eq!(snap.votes_for, None);
        assert_eq!(
            reg.get(id).unwrap().settlement.as_ref().unwrap().total_paid(),
            Some(Amount::ZERO)
        );
    }

    #[test]
    fn contest_of_open_event_is_not_resolved() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[]);
        let err = reg
            .contest(
                &addr("bob"),
                ContestRequest {
                    parent: id,
                    proposal: proposal("bob", Vote::Against),
                },
                Amount::units(1),
                at(T0 + 5),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotResolved);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.next_id(), EventId::new(2));
    }

    #[test]
    fn contest_creates_linked_version() {
        let mut reg = registry();
        let root = event_with(&mut reg, Vote::For, &[]);
        reveal(&mut reg, root, "alice", Vote::For);
        reg.resolve(root, at(REVEAL_END)).unwrap();
        let before = reg.get(root).unwrap().clone();

        let mut p = proposal("bob", Vote::Against);
        p.description = "x".repeat(500);
        let t = reg
            .contest(
                &addr("bob"),
                ContestRequest { parent: root, proposal: p },
                Amount::units(2),
                at(REVEAL_END + 1),
            )
            .unwrap();
        assert_eq!(t.effect, Effect::Contested { parent: root });

        let child = reg.get(t.event).unwrap();
        assert_eq!(child.event.version, 2);
        assert_eq!(child.event.parent_id, Some(root));
        assert_eq!(child.pool(), Amount::units(2));
        assert_eq!(child.event.commit_count, 1);
        assert_eq!(reg.get(root).unwrap(), &before);
        assert_eq!(reg.genealogy().contests_of(root), &[t.event]);
        assert_eq!(reg.lineage(t.event).unwrap(), vec![t.event, root]);
    }

    #[test]
    fn contest_description_limit() {
        let mut reg = registry();
        let root = event_with(&mut reg, Vote::For, &[]);
        reg.resolve(root, at(REVEAL_END)).unwrap();
        let mut p = proposal("bob", Vote::Against);
        p.description = "x".repeat(501);
        let err = reg
            .contest(
                &addr("bob"),
                ContestRequest { parent: root, proposal: p },
                Amount::units(1),
                at(REVEAL_END),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DescriptionTooLong);
        assert!(reg.genealogy().is_empty());
    }

    #[test]
    fn contest_of_unknown_parent() {
        let mut reg = registry();
        let err = reg
            .contest(
                &addr("bob"),
                ContestRequest {
                    parent: EventId::new(42),
                    proposal: proposal("bob", Vote::For),
                },
                Amount::units(1),
                at(T0),
            )
            .unwrap_err();
        assert_eq!(err, AdjudicationError::EventNotFound(EventId::new(42)));
    }

    #[test]
    fn second_commit_is_rejected_and_changes_nothing() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[("bob", Vote::For)]);
        let before = reg.get(id).unwrap().clone();
        let err = reg
            .commit_vote(id, &addr("bob"), hash("bob", Vote::Against), Amount::units(5), at(T0 + 2))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyCommitted);
        assert_eq!(reg.get(id).unwrap(), &before);
    }

    #[test]
    fn full_attached_value_is_locked() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[]);
        reg.commit_vote(id, &addr("bob"), hash("bob", Vote::For), Amount::units(3), at(T0))
            .unwrap();
        assert_eq!(
            reg.get(id).unwrap().commitment(&addr("bob")).unwrap().stake_locked,
            Amount::units(3)
        );
        assert_eq!(reg.get(id).unwrap().pool(), Amount::units(4));
    }

    #[test]
    fn oversized_stake_is_rejected_and_event_still_resolves() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[("carol", Vote::Against)]);
        let err = reg
            .commit_vote(id, &addr("bob"), hash("bob", Vote::For), Amount::new(1 << 110), at(T0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PoolLimit);
        assert!(reg.get(id).unwrap().commitment(&addr("bob")).is_none());

        // Filling the pool exactly to the limit is still accepted.
        let room = historia_stake::MAX_POOL.checked_sub(reg.get(id).unwrap().pool()).unwrap();
        reg.commit_vote(id, &addr("bob"), hash("bob", Vote::For), room, at(T0))
            .unwrap();
        let err = reg
            .commit_vote(id, &addr("dave"), hash("dave", Vote::For), Amount::units(1), at(T0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PoolLimit);

        reveal(&mut reg, id, "alice", Vote::For);
        reveal(&mut reg, id, "bob", Vote::For);
        reveal(&mut reg, id, "carol", Vote::Against);
        let t = reg.resolve(id, at(REVEAL_END)).unwrap();
        let s = t.resolution().unwrap().settlement();
        assert_eq!(s.outcome, Outcome::Accepted);
        assert!(s.is_conserved());
    }

    #[test]
    fn oversized_proposal_stake_is_rejected() {
        let mut reg = registry();
        let mut p = proposal("alice", Vote::For);
        p.stake = Amount::new(u128::from(u64::MAX) + 1);
        let attached = p.stake;
        let err = reg.submit(&addr("alice"), p, attached, at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PoolLimit);
        assert!(reg.is_empty());
    }

    #[test]
    fn double_reveal_is_rejected() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[]);
        reveal(&mut reg, id, "alice", Vote::For);
        let err = reg
            .reveal_vote(id, &addr("alice"), Vote::For, &secret("alice"), at(COMMIT_END + 5))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyRevealed);
    }

    #[test]
    fn resolve_twice_is_already_resolved() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[]);
        reveal(&mut reg, id, "alice", Vote::For);
        reg.resolve(id, at(REVEAL_END)).unwrap();
        let err = reg.resolve(id, at(REVEAL_END + 60)).unwrap_err();
        assert_eq!(
            err,
            AdjudicationError::AlreadyResolved(id, EventStatus::Resolved)
        );
    }

    #[test]
    fn actions_on_terminal_event_report_already_resolved() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[]);
        reg.resolve(id, at(REVEAL_END)).unwrap();
        let err = reg
            .commit_vote(id, &addr("bob"), hash("bob", Vote::For), Amount::units(1), at(T0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyResolved);
    }

    #[test]
    fn tie_refunds_revealers_only() {
        let mut reg = registry();
        let id = event_with(
            &mut reg,
            Vote::For,
            &[("bob", Vote::Against), ("carol", Vote::For)],
        );
        reveal(&mut reg, id, "alice", Vote::For);
        reveal(&mut reg, id, "bob", Vote::Against);
        let t = reg.resolve(id, at(REVEAL_END)).unwrap();
        let s = t.resolution().unwrap().settlement();
        assert_eq!(s.outcome, Outcome::Tied);
        assert_eq!(s.stake_of(&addr("alice")).unwrap().paid, Amount::units(1));
        assert_eq!(s.stake_of(&addr("bob")).unwrap().paid, Amount::units(1));
        assert_eq!(s.stake_of(&addr("carol")).unwrap().fate, StakeFate::Forfeited);
        assert_eq!(s.platform_remainder, Amount::units(1));
    }

    #[test]
    fn rollback_restores_prior_state() {
        let mut reg = registry();
        let id = event_with(&mut reg, Vote::For, &[]);
        let before = reg.get(id).unwrap().clone();
        let t = reg
            .commit_vote(id, &addr("bob"), hash("bob", Vote::For), Amount::units(1), at(T0))
            .unwrap();
        reg.rollback(t.undo);
        assert_eq!(reg.get(id).unwrap(), &before);

        let t = reg
            .submit(&addr("bob"), proposal("bob", Vote::For), Amount::units(1), at(T0))
            .unwrap();
        reg.rollback(t.undo);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.next_id(), EventId::new(2));
    }

    #[test]
    fn due_events_and_restore() {
        let mut reg = registry();
        let a = event_with(&mut reg, Vote::For, &[]);
        let b = event_with(&mut reg, Vote::For, &[]);
        reg.resolve(b, at(REVEAL_END)).unwrap();
        assert!(reg.due_for_resolution(at(REVEAL_END - 1)).is_empty());
        assert_eq!(reg.due_for_resolution(at(REVEAL_END)), vec![a]);
        assert_eq!(reg.open_count(), 1);

        let restored = EventRegistry::restore(
            ProtocolParams::default(),
            reg.records().cloned().collect::<Vec<_>>(),
        );
        assert_eq!(restored.next_id(), EventId::new(3));
        assert_eq!(restored.get(a), reg.get(a));
    }

    #[test]
    fn unknown_event() {
        let mut reg = registry();
        let err = reg.resolve(EventId::new(7), at(T0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EventNotFound);
    }
}
