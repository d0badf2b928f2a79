//! Nullable store: thread-safe in-memory ledger storage.

use historia_store::{ChangeSet, LedgerStore, MetaStore, StoreError};
use historia_types::{Address, Amount, EventId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    events: BTreeMap<EventId, Vec<u8>>,
    credits: BTreeMap<Address, Amount>,
    meta: HashMap<String, Vec<u8>>,
}

/// In-memory [`LedgerStore`]. Can be told to fail the next write, to
/// exercise rollback paths.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_next_apply: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `apply` return a backend error without writing.
    pub fn fail_next_apply(&self) {
        self.fail_next_apply.store(true, Ordering::SeqCst);
    }

    pub fn event_count(&self) -> usize {
        self.tables().map(|t| t.events.len()).unwrap_or(0)
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }
}

impl LedgerStore for NullStore {
    fn load_events(&self) -> Result<Vec<(EventId, Vec<u8>)>, StoreError> {
        Ok(self
            .tables()?
            .events
            .iter()
            .map(|(id, bytes)| (*id, bytes.clone()))
            .collect())
    }

    fn get_event(&self, id: EventId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.events.get(&id).cloned())
    }

    fn load_credits(&self) -> Result<Vec<(Address, Amount)>, StoreError> {
        Ok(self
            .tables()?
            .credits
            .iter()
            .map(|(a, v)| (a.clone(), *v))
            .collect())
    }

    fn apply(&self, changes: &ChangeSet) -> Result<(), StoreError> {
        if self.fail_next_apply.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        let mut t = self.tables()?;
        for (id, bytes) in &changes.events {
            t.events.insert(*id, bytes.clone());
        }
        for (addr, amount) in &changes.credits {
            t.credits.insert(addr.clone(), *amount);
        }
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.tables()?.meta.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.meta.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_failure_writes_nothing() {
        let store = NullStore::new();
        let mut cs = ChangeSet::new();
        cs.put_event(EventId::FIRST, vec![1]);
        store.fail_next_apply();
        assert!(store.apply(&cs).is_err());
        assert_eq!(store.event_count(), 0);
        store.apply(&cs).unwrap();
        assert_eq!(store.event_count(), 1);
    }

    #[test]
    fn schema_version_defaults_to_zero() {
        let store = NullStore::new();
        assert_eq!(store.schema_version().unwrap(), 0);
        store.set_schema_version(3).unwrap();
        assert_eq!(store.schema_version().unwrap(), 3);
    }
}
