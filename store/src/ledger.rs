//! Ledger storage trait.

use crate::{ChangeSet, StoreError};
use historia_types::{Address, Amount, EventId};

/// Durable storage of event records and credit balances.
pub trait LedgerStore: Send + Sync {
    /// Every stored event record, in id order.
    fn load_events(&self) -> Result<Vec<(EventId, Vec<u8>)>, StoreError>;

    fn get_event(&self, id: EventId) -> Result<Option<Vec<u8>>, StoreError>;

    /// Every stored credit balance.
    fn load_credits(&self) -> Result<Vec<(Address, Amount)>, StoreError>;

    /// Write the whole change set, or nothing.
    fn apply(&self, changes: &ChangeSet) -> Result<(), StoreError>;
}
