//! Caller identity as presented by the hosting ledger.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The identity of a protocol caller (proposer, voter, fee recipient).
///
/// The hosting ledger authenticates callers; this type only guarantees the
/// address is usable inside a commitment preimage: non-empty, no whitespace,
/// and no `:` (the preimage field separator).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and validate a raw address string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        if Self::is_well_formed(&s) {
            Ok(Self(s))
        } else {
            Err(TypesError::InvalidAddress(s))
        }
    }

    /// Construct from a literal known to be well formed.
    pub fn from_static(s: &'static str) -> Self {
        debug_assert!(Self::is_well_formed(s));
        Self(s.to_string())
    }

    fn is_well_formed(s: &str) -> bool {
        !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == ':')
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.0
    }
}
