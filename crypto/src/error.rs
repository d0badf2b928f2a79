use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommitmentError {
    #[error("vote must be encoded as \"1\" or \"0\", got {0:?}")]
    NonCanonicalVote(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}
