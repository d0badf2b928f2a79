//! Payout-engine errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakeError {
    #[error("arithmetic overflow in settlement")]
    Overflow,

    #[error("settlement requires at least one revealed stake")]
    NoRevealers,

    #[error("staker {0} appears more than once")]
    DuplicateStaker(String),
}
