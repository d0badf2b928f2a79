//! Cryptographic primitives for Historia blind voting.
//!
//! - **Commitment scheme**: `SHA-256(address ":" voteDigit ":" secret)`, binding
//!   the voter's address so a public hash cannot be replayed by another voter.
//! - **Secrets**: 256 bits from the OS CSPRNG, hex-encoded, zeroized on drop.
//!
//! Hiding rests entirely on secret entropy. A short or guessable secret is a
//! user-facing risk the protocol cannot detect.

pub mod commitment;
pub mod error;
pub mod secret;

pub use commitment::{commit, commit_raw, preimage, sha256, verify};
pub use error::CommitmentError;
pub use secret::{OsSecrets, Secret, SecretSource};
