//! The unit of atomic persistence.

use historia_types::{Address, Amount, EventId};

/// Everything one accepted transition changed.
///
/// Event records are opaque encoded bytes; credit balances are the new
/// absolute balance of each touched address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub events: Vec<(EventId, Vec<u8>)>,
    pub credits: Vec<(Address, Amount)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_event(&mut self, id: EventId, bytes: Vec<u8>) -> &mut Self {
        self.events.push((id, bytes));
        self
    }

    pub fn put_credit(&mut self, addr: Address, balance: Amount) -> &mut Self {
        self.credits.push((addr, balance));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.credits.is_empty()
    }
}
