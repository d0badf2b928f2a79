//! Stake ledger and payout engine.
//!
//! At resolution every locked stake of an event meets exactly one fate:
//! - **Won**: revealed on the majority side; principal back plus a share of the
//!   losing pool proportional to stake.
//! - **Lost**: revealed on the minority side; joins the losing pool.
//! - **Refunded**: revealed in a tie; principal back, no fee.
//! - **Forfeited**: never revealed; kept by the platform.
//! - **Retained**: the event was voided; kept by the platform.
//!
//! The fee (1% proposer + 1% platform by default) is cut from the losing pool
//! before distribution and never from a winner's principal. Rounding dust goes
//! to the platform remainder, so
//! `Σ locked = Σ payouts + proposer fee + platform fee + platform remainder`
//! holds exactly.

pub mod credits;
pub mod entry;
pub mod error;
pub mod fees;
pub mod settlement;

pub use credits::CreditLedger;
pub use entry::{StakeEntry, StakeFate, StakeOutcome};
pub use error::StakeError;
pub use fees::FeeSplit;
pub use settlement::{settle, void, Settlement, MAX_POOL};
