use historia_stake::StakeError;
use historia_types::{Amount, EventId, EventStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjudicationError {
    #[error("event {0} does not exist")]
    EventNotFound(EventId),

    #[error("event {event} is in {status}, {action} is not allowed")]
    WrongPhase {
        event: EventId,
        status: EventStatus,
        action: &'static str,
    },

    #[error("{voter} has already committed on event {event}")]
    AlreadyCommitted { event: EventId, voter: String },

    #[error("{voter} has already revealed on event {event}")]
    AlreadyRevealed { event: EventId, voter: String },

    #[error("event {0} is already {1}")]
    AlreadyResolved(EventId, EventStatus),

    #[error("{voter} has no commitment on event {event}")]
    NoCommitment { event: EventId, voter: String },

    #[error("vote and secret do not match the commitment of {voter} on event {event}")]
    HashMismatch { event: EventId, voter: String },

    #[error("insufficient stake: needed {needed}, provided {provided}")]
    InsufficientStake { needed: Amount, provided: Amount },

    #[error("invalid duration: commit {commit_minutes}m, reveal {reveal_minutes}m")]
    InvalidDuration {
        commit_minutes: u64,
        reveal_minutes: u64,
    },

    #[error("description is {len} characters, at most {max} allowed")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("description is empty")]
    EmptyDescription,

    #[error("event {0} is not resolved yet and cannot be contested")]
    NotResolved(EventId),

    #[error("stake pool would reach {pool}, at most {limit} allowed")]
    PoolLimit { pool: Amount, limit: Amount },

    #[error("arithmetic overflow")]
    Overflow,

    #[error("settlement failed: {0}")]
    Stake(#[from] StakeError),
}

/// Stable discriminator of an [`AdjudicationError`], for callers that render
/// their own messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EventNotFound,
    WrongPhase,
    AlreadyCommitted,
    AlreadyRevealed,
    AlreadyResolved,
    NoCommitment,
    HashMismatch,
    InsufficientStake,
    InvalidDuration,
    DescriptionTooLong,
    EmptyDescription,
    NotResolved,
    PoolLimit,
    Overflow,
    Settlement,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventNotFound => "EventNotFound",
            Self::WrongPhase => "WrongPhase",
            Self::AlreadyCommitted => "AlreadyCommitted",
            Self::AlreadyRevealed => "AlreadyRevealed",
            Self::AlreadyResolved => "AlreadyResolved",
            Self::NoCommitment => "NoCommitment",
            Self::HashMismatch => "HashMismatch",
            Self::InsufficientStake => "InsufficientStake",
            Self::InvalidDuration => "InvalidDuration",
            Self::DescriptionTooLong => "DescriptionTooLong",
            Self::EmptyDescription => "EmptyDescription",
            Self::NotResolved => "NotResolved",
            Self::PoolLimit => "PoolLimit",
            Self::Overflow => "Overflow",
            Self::Settlement => "Settlement",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AdjudicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EventNotFound(_) => ErrorKind::EventNotFound,
            Self::WrongPhase { .. } => ErrorKind::WrongPhase,
            Self::AlreadyCommitted { .. } => ErrorKind::AlreadyCommitted,
            Self::AlreadyRevealed { .. } => ErrorKind::AlreadyRevealed,
            Self::AlreadyResolved(..) => ErrorKind::AlreadyResolved,
            Self::NoCommitment { .. } => ErrorKind::NoCommitment,
            Self::HashMismatch { .. } => ErrorKind::HashMismatch,
            Self::InsufficientStake { .. } => ErrorKind::InsufficientStake,
            Self::InvalidDuration { .. } => ErrorKind::InvalidDuration,
            Self::DescriptionTooLong { .. } => ErrorKind::DescriptionTooLong,
            Self::EmptyDescription => ErrorKind::EmptyDescription,
            Self::NotResolved(_) => ErrorKind::NotResolved,
            Self::PoolLimit { .. } => ErrorKind::PoolLimit,
            Self::Overflow | Self::Stake(StakeError::Overflow) => ErrorKind::Overflow,
            Self::Stake(_) => ErrorKind::Settlement,
        }
    }
}
