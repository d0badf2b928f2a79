//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the node (clock, storage, randomness) sits
//! behind a trait. This crate provides test implementations that return
//! deterministic values, can be steered programmatically, and never touch
//! the filesystem.

pub mod clock;
pub mod secrets;
pub mod store;

pub use clock::NullClock;
pub use secrets::NullSecrets;
pub use store::NullStore;
