//! Binary votes and their canonical encodings.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vote on whether an event's claim holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vote {
    /// The claim is true.
    For,
    /// The claim is false.
    Against,
}

impl Vote {
    /// The single canonical character used inside commitment preimages.
    pub fn digit(&self) -> char {
        match self {
            Self::For => '1',
            Self::Against => '0',
        }
    }

    /// Parse the commitment encoding. Only `"1"` and `"0"` are accepted.
    pub fn from_digit(s: &str) -> Result<Self, TypesError> {
        match s {
            "1" => Ok(Self::For),
            "0" => Ok(Self::Against),
            other => Err(TypesError::InvalidVote(other.to_string())),
        }
    }

    /// Parse the boolean argument of a `RevealVote` call (`"true"` / `"false"`).
    pub fn from_call_arg(s: &str) -> Result<Self, TypesError> {
        match s {
            "true" => Ok(Self::For),
            "false" => Ok(Self::Against),
            other => Err(TypesError::InvalidVote(other.to_string())),
        }
    }

    pub fn from_bool(affirmative: bool) -> Self {
        if affirmative {
            Self::For
        } else {
            Self::Against
        }
    }

    pub fn is_for(&self) -> bool {
        matches!(self, Self::For)
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::For => f.write_str("FOR"),
            Self::Against => f.write_str("AGAINST"),
        }
    }
}
