//! Contests: new, linked versions of a terminal event.

use crate::error::AdjudicationError;
use crate::event::EventRecord;
use crate::lifecycle::Proposal;
use historia_types::EventId;

/// A request to re-adjudicate `parent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContestRequest {
    pub parent: EventId,
    pub proposal: Proposal,
}

/// Version and parent link of a contest of `parent`.
///
/// Only terminal events may be contested, which keeps every chain acyclic
/// and ending at a version-1 root.
pub(crate) fn check_contestable(
    parent_id: EventId,
    parent: Option<&EventRecord>,
) -> Result<(u32, Option<EventId>), AdjudicationError> {
    let parent = parent.ok_or(AdjudicationError::EventNotFound(parent_id))?;
    if !parent.event.is_terminal() {
        return Err(AdjudicationError::NotResolved(parent_id));
    }
    let version = parent
        .event
        .version
        .checked_add(1)
        .ok_or(AdjudicationError::Overflow)?;
    Ok((version, Some(parent_id)))
}
