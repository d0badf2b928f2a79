//! Adjudication of factual claims by stake-weighted commit-reveal voting.
//!
//! An event moves `COMMIT → REVEAL → {RESOLVED | VOIDED}`. The first
//! transition is purely time-gated and evaluated lazily from the clock; the
//! terminal transition happens only through an explicit `resolve`, which any
//! caller may invoke once the reveal window has elapsed.
//!
//! Every operation takes the caller's single clock reading as `now` and runs
//! all of its checks before the first mutation, so a rejected action leaves
//! the registry exactly as it was.

pub mod contest;
pub mod error;
pub mod event;
pub mod genealogy;
pub mod lifecycle;
pub mod registry;
pub mod snapshot;

pub use contest::ContestRequest;
pub use error::{AdjudicationError, ErrorKind};
pub use event::{Commitment, Event, EventRecord};
pub use genealogy::GenealogyIndex;
pub use lifecycle::{Proposal, Resolution};
pub use registry::{Effect, EventRegistry, Transition, Undo};
pub use snapshot::EventSnapshot;
