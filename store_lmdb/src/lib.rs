//! LMDB storage backend for the Historia ledger.
//!
//! Implements the `historia-store` traits with the `heed` LMDB bindings. One
//! environment holds three databases: `events` (big-endian event id →
//! encoded record), `credits` (address → bincode amount) and `meta`.

pub mod environment;
pub mod error;
pub mod ledger;
pub mod meta;

pub use environment::LmdbStore;
pub use error::LmdbError;
