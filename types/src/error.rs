//! Parsing errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid commit hash: {0}")]
    InvalidHash(String),

    #[error("invalid vote encoding: {0:?}")]
    InvalidVote(String),

    #[error("invalid event id: {0:?}")]
    InvalidEventId(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("invalid protocol parameters: {0}")]
    InvalidParams(String),
}
