//! Per-vote secrets.

use crate::error::CommitmentError;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of random bytes in a generated secret.
pub const SECRET_BYTES: usize = 32;

/// A vote secret. Never part of ledger state; it travels only at reveal time.
///
/// Intentionally not `Clone`; the contents are zeroized on drop and
/// redacted from `Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Secret(String);

impl Secret {
    /// Wrap a caller-chosen secret. Any string is accepted.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate 256 bits from the OS CSPRNG, hex-encoded (64 characters).
    pub fn generate() -> Result<Self, CommitmentError> {
        let mut bytes = [0u8; SECRET_BYTES];
        getrandom::getrandom(&mut bytes).map_err(|e| CommitmentError::Entropy(e.to_string()))?;
        let secret = Self::from_bytes(&bytes);
        bytes.zeroize();
        Ok(secret)
    }

    /// Hex-encode raw secret bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Where new secrets come from.
pub trait SecretSource: Send + Sync {
    fn generate(&self) -> Result<Secret, CommitmentError>;
}

/// Secrets from the operating system's CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsSecrets;

impl SecretSource for OsSecrets {
    fn generate(&self) -> Result<Secret, CommitmentError> {
        Secret::generate()
    }
}
