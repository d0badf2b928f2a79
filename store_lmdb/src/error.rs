use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("corrupted entry: {0}")]
    Corruption(String),
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<LmdbError> for historia_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::Serialization(msg) => Self::Serialization(msg),
            LmdbError::Corruption(msg) => Self::Corruption(msg),
            other => Self::Backend(other.to_string()),
        }
    }
}
