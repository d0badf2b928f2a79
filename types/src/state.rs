//! Lifecycle status and adjudicated outcome of an event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an event is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    /// Hidden commitments are being collected.
    Commit,
    /// Commitments are being opened.
    Reveal,
    /// Tallied; stakes redistributed.
    Resolved,
    /// Nobody revealed; no adjudicated outcome.
    Voided,
}

impl EventStatus {
    /// Resolved and voided events never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Voided)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "COMMIT",
            Self::Reveal => "REVEAL",
            Self::Resolved => "RESOLVED",
            Self::Voided => "VOIDED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The adjudicated result of an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Tied,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Tied => "TIED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
