//! Ordinal event identifiers.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of an event, assigned in creation order starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// The first id ever assigned.
    pub const FIRST: Self = Self(1);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` on exhaustion.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Big-endian key bytes, so storage iteration follows creation order.
    pub fn to_key(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    pub fn from_key(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = TypesError;

    /// Accepts `"7"` and `"#7"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('#')
            .unwrap_or(s)
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidEventId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_and_without_hash_prefix() {
        assert_eq!("7".parse::<EventId>().unwrap(), EventId::new(7));
        assert_eq!("#7".parse::<EventId>().unwrap(), EventId::new(7));
        assert!("seven".parse::<EventId>().is_err());
    }

    #[test]
    fn key_order_matches_id_order() {
        assert!(EventId::new(2).to_key() < EventId::new(256).to_key());
        assert_eq!(EventId::from_key(EventId::new(42).to_key()), EventId::new(42));
    }
}
