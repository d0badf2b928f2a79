//! Hiding, binding vote commitments.

use crate::error::CommitmentError;
use historia_types::{Address, CommitHash, Vote};
use sha2::{Digest, Sha256};

/// Separator between preimage fields.
const SEPARATOR: u8 = b':';

/// Compute a SHA-256 digest of arbitrary data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// The exact bytes that are hashed: `address ":" digit ":" secret`.
pub fn preimage(address: &Address, vote: Vote, secret: &str) -> Vec<u8> {
    let addr = address.as_str().as_bytes();
    let mut out = Vec::with_capacity(addr.len() + secret.len() + 3);
    out.extend_from_slice(addr);
    out.push(SEPARATOR);
    out.push(vote.digit() as u8);
    out.push(SEPARATOR);
    out.extend_from_slice(secret.as_bytes());
    out
}

/// Commit to `vote` on behalf of `address`.
pub fn commit(address: &Address, vote: Vote, secret: &str) -> CommitHash {
    CommitHash::new(sha256(&preimage(address, vote, secret)))
}

/// Recompute the commitment and compare it byte for byte with `expected`.
pub fn verify(address: &Address, vote: Vote, secret: &str, expected: &CommitHash) -> bool {
    commit(address, vote, secret) == *expected
}

/// Commit from untyped inputs, as a debugging tool would receive them.
///
/// Only the canonical vote digits `"1"` and `"0"` are accepted; `"true"`,
/// `"false"` or any other spelling is rejected so the same vote can never
/// hash two ways.
pub fn commit_raw(address: &str, vote: &str, secret: &str) -> Result<CommitHash, CommitmentError> {
    let address =
        Address::parse(address).map_err(|e| CommitmentError::InvalidAddress(e.to_string()))?;
    let vote = Vote::from_digit(vote).map_err(|_| CommitmentError::NonCanonicalVote(vote.into()))?;
    Ok(commit(&address, vote, secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn preimage_layout() {
        let p = preimage(&addr("g1alice"), Vote::For, "deadbeef");
        assert_eq!(p, b"g1alice:1:deadbeef");
        let p = preimage(&addr("g1alice"), Vote::Against, "");
        assert_eq!(p, b"g1alice:0:");
    }

    #[test]
    fn matches_reference_sha256() {
        // sha256("abc")
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let h = commit(&addr("g1alice"), Vote::For, "s3cret");
        assert_eq!(h.as_bytes(), &sha256(b"g1alice:1:s3cret"));
    }

    #[test]
    fn verify_accepts_own_commitment() {
        let a = addr("g1alice");
        let h = commit(&a, Vote::Against, "abc123");
        assert!(verify(&a, Vote::Against, "abc123", &h));
    }

    #[test]
    fn verify_rejects_any_changed_input() {
        let a = addr("g1alice");
        let h = commit(&a, Vote::For, "abc123");
        assert!(!verify(&a, Vote::Against, "abc123", &h));
        assert!(!verify(&a, Vote::For, "abc124", &h));
        assert!(!verify(&addr("g1bob"), Vote::For, "abc123", &h));
    }

    #[test]
    fn address_binding() {
        let h1 = commit(&addr("g1alice"), Vote::For, "same");
        let h2 = commit(&addr("g1bob"), Vote::For, "same");
        assert_ne!(h1, h2);
    }

    #[test]
    fn raw_commit_rejects_boolean_words() {
        assert!(matches!(
            commit_raw("g1alice", "true", "s"),
            Err(CommitmentError::NonCanonicalVote(_))
        ));
        assert!(commit_raw("g1alice", "false", "s").is_err());
        assert_eq!(
            commit_raw("g1alice", "1", "s").unwrap(),
            commit(&addr("g1alice"), Vote::For, "s")
        );
    }

    #[test]
    fn raw_commit_rejects_bad_address() {
        assert!(matches!(
            commit_raw("g1:alice", "1", "s"),
            Err(CommitmentError::InvalidAddress(_))
        ));
    }
}
