//! Nullable secret source.

use historia_crypto::{CommitmentError, Secret, SecretSource};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out `seed‖counter` secrets, hex-encoded, in order.
pub struct NullSecrets {
    seed: u64,
    counter: AtomicU64,
}

impl NullSecrets {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            counter: AtomicU64::new(0),
        }
    }
}

impl SecretSource for NullSecrets {
    fn generate(&self) -> Result<Secret, CommitmentError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&self.seed.to_be_bytes());
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Ok(Secret::from_bytes(&bytes))
    }
}
