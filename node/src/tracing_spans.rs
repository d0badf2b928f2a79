//! [`tracing::Span`] constructors shared across the node, so every record
//! of one transition carries the same fields.

use historia_types::{Address, EventId};
use tracing::{info_span, Span};

/// Span covering one protocol call, from parsing to persistence.
pub fn action_span(func: &str, caller: &Address, event: Option<EventId>) -> Span {
    match event {
        Some(event) => info_span!("action", func = %func, caller = %caller, event = %event),
        None => info_span!("action", func = %func, caller = %caller),
    }
}

/// Span covering one keeper sweep.
pub fn keeper_span(due: usize) -> Span {
    info_span!("keeper_sweep", due)
}

/// Span covering ledger replay at startup.
pub fn restore_span() -> Span {
    info_span!("restore")
}
