//! The Historia node: a single writer over the event registry and credits.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn, Instrument};

use historia_adjudication::{
    AdjudicationError, Effect, EventRecord, EventRegistry, EventSnapshot, Resolution,
};
use historia_nullables::NullStore;
use historia_reputation::{Reputation, UserStats};
use historia_stake::CreditLedger;
use historia_store::{ChangeSet, LedgerStore};
use historia_store_lmdb::LmdbStore;
use historia_types::{Address, Amount, Clock, EventId, EventStatus, SystemClock, Timestamp};

use crate::action::{Action, ProtocolCall};
use crate::config::{NodeConfig, StorageBackend};
use crate::error::NodeError;
use crate::metrics::NodeMetrics;
use crate::tracing_spans::{action_span, restore_span};

/// What an accepted call did, and the event as it now stands.
#[derive(Clone, Debug)]
pub struct Receipt {
    pub event: EventId,
    pub effect: Effect,
    pub snapshot: EventSnapshot,
    /// Balances credited by a resolution.
    pub credited: Vec<(Address, Amount)>,
}

struct LedgerState {
    registry: EventRegistry,
    credits: CreditLedger,
}

/// A running Historia node.
///
/// Every call takes the same lock, reads the clock once, and is persisted
/// before the lock is released. Readers never observe a partial transition.
pub struct HistoriaNode {
    config: NodeConfig,
    state: Mutex<LedgerState>,
    store: Arc<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    metrics: Arc<NodeMetrics>,
}

impl HistoriaNode {
    /// Open the store named by `config` and replay it.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        let store: Arc<dyn LedgerStore> = match config.storage {
            StorageBackend::Memory => Arc::new(NullStore::new()),
            StorageBackend::Lmdb => {
                Arc::new(LmdbStore::open(&config.data_dir, config.lmdb_map_size)?)
            }
        };
        Self::with_parts(config, store, Arc::new(SystemClock))
    }

    /// Build a node over an explicit store and clock.
    pub fn with_parts(
        config: NodeConfig,
        store: Arc<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError> {
        config.validate()?;
        let _span = restore_span().entered();
        let records = store
            .load_events()?
            .into_iter()
            .map(|(id, bytes)| decode_record(id, &bytes))
            .collect::<Result<Vec<_>, _>>()?;
        let registry = EventRegistry::restore(config.params.clone(), records);
        let credits = CreditLedger::restore(store.load_credits()?);

        let metrics = Arc::new(NodeMetrics::new());
        metrics.open_events.set(registry.open_count() as i64);
        info!(
            events = registry.len(),
            open = registry.open_count(),
            credited = credits.len(),
            "ledger restored"
        );

        Ok(Self {
            config,
            state: Mutex::new(LedgerState { registry, credits }),
            store,
            clock,
            metrics,
        })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<NodeMetrics> {
        &self.metrics
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Parse, apply and persist one call.
    pub async fn execute(&self, call: ProtocolCall) -> Result<Receipt, NodeError> {
        let action = match Action::parse(&call) {
            Ok(a) => a,
            Err(e) => {
                self.metrics.actions_rejected.inc();
                return Err(e);
            }
        };
        let span = action_span(&call.func, &call.caller, action.target());
        let result = self.apply(&call, action).instrument(span).await;
        if result.is_err() {
            self.metrics.actions_rejected.inc();
        }
        result
    }

    async fn apply(&self, call: &ProtocolCall, action: Action) -> Result<Receipt, NodeError> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();
        let caller = &call.caller;
        let send = call.send;

        let registry = &mut state.registry;
        let transition = match action {
            Action::Submit(p) => registry.submit(caller, p, send, now),
            Action::CommitVote { event, commit_hash } => {
                registry.commit_vote(event, caller, commit_hash, send, now)
            }
            Action::RevealVote {
                event,
                vote,
                secret,
            } => registry.reveal_vote(event, caller, vote, &secret, now),
            Action::Resolve { event } => registry.resolve(event, now),
            Action::Contest(req) => registry.contest(caller, req, send, now),
        }?;

        let prior_credits = transition.resolution().map(|_| state.credits.clone());
        let credited = match transition.resolution() {
            Some(res) => {
                let platform = &self.config.params.platform_address;
                match state.credits.apply(res.settlement(), platform) {
                    Ok(c) => c,
                    Err(e) => {
                        state.registry.rollback(transition.undo);
                        return Err(e.into());
                    }
                }
            }
            None => Vec::new(),
        };

        let persisted = self.persist(&state.registry, transition.event, &credited);
        if let Err(e) = persisted {
            warn!(event = %transition.event, error = %e, "persistence failed, rolling back");
            state.registry.rollback(transition.undo);
            if let Some(prior) = prior_credits {
                state.credits = prior;
            }
            self.metrics.rollbacks.inc();
            return Err(e);
        }

        self.metrics.record(&transition.effect);
        self.metrics
            .open_events
            .set(state.registry.open_count() as i64);

        let snapshot = state
            .registry
            .snapshot(transition.event, now)
            .ok_or(AdjudicationError::EventNotFound(transition.event))?;
        Ok(Receipt {
            event: transition.event,
            effect: transition.effect,
            snapshot,
            credited,
        })
    }

    fn persist(
        &self,
        registry: &EventRegistry,
        event: EventId,
        credited: &[(Address, Amount)],
    ) -> Result<(), NodeError> {
        let record = registry
            .get(event)
            .ok_or(AdjudicationError::EventNotFound(event))?;
        let mut changes = ChangeSet::new();
        changes.put_event(event, encode_record(record)?);
        for (addr, balance) in credited {
            changes.put_credit(addr.clone(), *balance);
        }
        self.store.apply(&changes)?;
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub async fn event(&self, id: EventId) -> Option<EventSnapshot> {
        let now = self.clock.now();
        self.state.lock().await.registry.snapshot(id, now)
    }

    pub async fn events(&self) -> Vec<EventSnapshot> {
        let now = self.clock.now();
        self.state.lock().await.registry.snapshots(now)
    }

    /// The full stored record, including commitments and settlement.
    pub async fn record(&self, id: EventId) -> Option<EventRecord> {
        self.state.lock().await.registry.get(id).cloned()
    }

    pub async fn user_stats(&self, address: &Address) -> UserStats {
        let state = self.state.lock().await;
        UserStats::aggregate(address, state.registry.records())
    }

    pub async fn reputation(&self, address: &Address) -> Reputation {
        let state = self.state.lock().await;
        Reputation::for_address(address, state.registry.records())
    }

    pub async fn credit(&self, address: &Address) -> Amount {
        self.state.lock().await.credits.balance(address)
    }

    /// `id` and each ancestor back to the root, newest first.
    pub async fn lineage(&self, id: EventId) -> Result<Vec<EventSnapshot>, NodeError> {
        let now = self.clock.now();
        let state = self.state.lock().await;
        let ids = state.registry.lineage(id)?;
        Ok(ids
            .into_iter()
            .filter_map(|i| state.registry.snapshot(i, now))
            .collect())
    }

    /// Direct contests of `id`.
    pub async fn contests_of(&self, id: EventId) -> Vec<EventId> {
        self.state
            .lock()
            .await
            .registry
            .genealogy()
            .contests_of(id)
            .to_vec()
    }

    /// Unresolved events whose reveal window has elapsed.
    pub async fn due_for_resolution(&self) -> Vec<EventId> {
        let now = self.clock.now();
        self.state.lock().await.registry.due_for_resolution(now)
    }

    /// The settlement of a terminal event.
    pub async fn resolution(&self, id: EventId) -> Option<Resolution> {
        let state = self.state.lock().await;
        let rec = state.registry.get(id)?;
        let settlement = rec.settlement.clone()?;
        Some(match rec.event.terminal {
            Some(EventStatus::Voided) => Resolution::Voided(settlement),
            _ => Resolution::Resolved(settlement),
        })
    }
}

fn encode_record(record: &EventRecord) -> Result<Vec<u8>, NodeError> {
    Ok(bincode::serialize(record)?)
}

fn decode_record(id: EventId, bytes: &[u8]) -> Result<EventRecord, NodeError> {
    let record: EventRecord = bincode::deserialize(bytes)?;
    if record.id() != id {
        return Err(NodeError::Codec(format!(
            "record under key {id} claims id {}",
            record.id()
        )));
    }
    Ok(record)
}
