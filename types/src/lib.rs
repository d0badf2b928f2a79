//! Fundamental types for the Historia protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! caller addresses, value amounts, timestamps, event ids, commit hashes, votes,
//! lifecycle enums and the tunable protocol parameters.

pub mod address;
pub mod amount;
pub mod error;
pub mod event_id;
pub mod hash;
pub mod params;
pub mod state;
pub mod time;
pub mod vote;

pub use address::Address;
pub use amount::Amount;
pub use error::TypesError;
pub use event_id::EventId;
pub use hash::CommitHash;
pub use params::ProtocolParams;
pub use state::{EventStatus, Outcome};
pub use time::{Clock, SystemClock, Timestamp};
pub use vote::Vote;
