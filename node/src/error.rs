use historia_adjudication::{AdjudicationError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("{0}")]
    Adjudication(#[from] AdjudicationError),

    #[error("settlement error: {0}")]
    Stake(#[from] historia_stake::StakeError),

    #[error("store error: {0}")]
    Store(#[from] historia_store::StoreError),

    #[error("invalid call: {0}")]
    InvalidCall(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// The protocol error kind, if this is a protocol rejection.
    pub fn protocol_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Adjudication(e) => Some(e.kind()),
            _ => None,
        }
    }
}

impl From<bincode::Error> for NodeError {
    fn from(e: bincode::Error) -> Self {
        Self::Codec(e.to_string())
    }
}
