//! LMDB implementation of LedgerStore.

use historia_store::{ChangeSet, LedgerStore, StoreError};
use historia_types::{Address, Amount, EventId};

use crate::{LmdbError, LmdbStore};

impl LedgerStore for LmdbStore {
    fn load_events(&self) -> Result<Vec<(EventId, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.events_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = item.map_err(LmdbError::from)?;
            out.push((decode_event_key(key)?, value.to_vec()));
        }
        Ok(out)
    }

    fn get_event(&self, id: EventId) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .events_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn load_credits(&self) -> Result<Vec<(Address, Amount)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.credits_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = item.map_err(LmdbError::from)?;
            let addr = std::str::from_utf8(key)
                .ok()
                .and_then(|s| Address::parse(s).ok())
                .ok_or_else(|| LmdbError::Corruption("credit key is not an address".into()))?;
            let amount: Amount = bincode::deserialize(value).map_err(LmdbError::from)?;
            out.push((addr, amount));
        }
        Ok(out)
    }

    /// One write transaction; dropping it on any error aborts every put.
    fn apply(&self, changes: &ChangeSet) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for (id, bytes) in &changes.events {
            self.events_db
                .put(&mut wtxn, &id.to_key(), bytes)
                .map_err(LmdbError::from)?;
        }
        for (addr, amount) in &changes.credits {
            let value = bincode::serialize(amount).map_err(LmdbError::from)?;
            self.credits_db
                .put(&mut wtxn, addr.as_str().as_bytes(), &value)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(
            events = changes.events.len(),
            credits = changes.credits.len(),
            "applied change set"
        );
        Ok(())
    }
}

fn decode_event_key(key: &[u8]) -> Result<EventId, LmdbError> {
    let arr: [u8; 8] = key
        .try_into()
        .map_err(|_| LmdbError::Corruption(format!("event key of {} bytes", key.len())))?;
    Ok(EventId::from_key(arr))
}
