//! Abstract storage traits for the Historia ledger.
//!
//! Every backend (LMDB, in-memory for testing) implements these traits. The
//! node depends only on the traits and encodes its own records, so this
//! crate stays independent of the adjudication engine.

pub mod changes;
pub mod error;
pub mod ledger;
pub mod meta;

pub use changes::ChangeSet;
pub use error::StoreError;
pub use ledger::LedgerStore;
pub use meta::MetaStore;

/// Schema version written by this release.
pub const SCHEMA_VERSION: u32 = 1;
