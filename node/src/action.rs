//! Inbound protocol calls and their typed form.

use std::str::FromStr;

use historia_adjudication::{ContestRequest, Proposal};
use historia_types::{Address, Amount, CommitHash, EventId, Vote};
use serde::{Deserialize, Serialize};

use crate::NodeError;

/// An authenticated call as delivered by the hosting ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolCall {
    pub caller: Address,
    /// Value attached to the call.
    pub send: Amount,
    pub func: String,
    pub args: Vec<String>,
}

impl ProtocolCall {
    pub fn new(
        caller: Address,
        send: Amount,
        func: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            caller,
            send,
            func: func.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// A parsed protocol call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Submit(Proposal),
    CommitVote {
        event: EventId,
        commit_hash: CommitHash,
    },
    RevealVote {
        event: EventId,
        vote: Vote,
        secret: String,
    },
    Resolve {
        event: EventId,
    },
    Contest(ContestRequest),
}

impl Action {
    /// `Submit(description, stake, commitMinutes, revealMinutes, hash)`,
    /// `CommitVote(eventId, hash)`, `RevealVote(eventId, voteBool, secret)`,
    /// `Resolve(eventId)`,
    /// `Contest(parentId, description, stake, commitMinutes, revealMinutes, hash)`.
    pub fn parse(call: &ProtocolCall) -> Result<Self, NodeError> {
        let args: Vec<&str> = call.args.iter().map(String::as_str).collect();
        match (call.func.as_str(), args.as_slice()) {
            ("Submit", [description, stake, commit, reveal, hash]) => Ok(Self::Submit(
                proposal(description, stake, commit, reveal, hash)?,
            )),
            ("CommitVote", [event, hash]) => Ok(Self::CommitVote {
                event: arg("eventId", event)?,
                commit_hash: arg("hash", hash)?,
            }),
            ("RevealVote", [event, vote, secret]) => Ok(Self::RevealVote {
                event: arg("eventId", event)?,
                vote: Vote::from_call_arg(vote)
                    .map_err(|e| NodeError::InvalidCall(format!("vote: {e}")))?,
                secret: secret.to_string(),
            }),
            ("Resolve", [event]) => Ok(Self::Resolve {
                event: arg("eventId", event)?,
            }),
            ("Contest", [parent, description, stake, commit, reveal, hash]) => {
                Ok(Self::Contest(ContestRequest {
                    parent: arg("parentId", parent)?,
                    proposal: proposal(description, stake, commit, reveal, hash)?,
                }))
            }
            (func @ ("Submit" | "CommitVote" | "RevealVote" | "Resolve" | "Contest"), _) => {
                Err(NodeError::InvalidCall(format!(
                    "{func} does not take {} arguments",
                    args.len()
                )))
            }
            (func, _) => Err(NodeError::InvalidCall(format!("unknown function '{func}'"))),
        }
    }

    /// The event the action targets, if it already exists.
    pub fn target(&self) -> Option<EventId> {
        match self {
            Self::Submit(_) => None,
            Self::CommitVote { event, .. }
            | Self::RevealVote { event, .. }
            | Self::Resolve { event } => Some(*event),
            Self::Contest(req) => Some(req.parent),
        }
    }
}

fn proposal(
    description: &str,
    stake: &str,
    commit: &str,
    reveal: &str,
    hash: &str,
) -> Result<Proposal, NodeError> {
    Ok(Proposal {
        description: description.to_string(),
        stake: arg("stake", stake)?,
        commit_minutes: arg("commitMinutes", commit)?,
        reveal_minutes: arg("revealMinutes", reveal)?,
        commit_hash: arg("hash", hash)?,
    })
}

fn arg<T>(name: &str, raw: &str) -> Result<T, NodeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| NodeError::InvalidCall(format!("{name} '{raw}': {e}")))
}
