//! Prometheus metrics for the Historia node.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`]; [`NodeMetrics::encode`]
//! renders it in the Prometheus text exposition format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, Encoder, IntCounter,
    IntGauge, Opts, Registry, TextEncoder,
};

use historia_adjudication::{Effect, Resolution};

use crate::NodeError;

pub struct NodeMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    pub events_submitted: IntCounter,
    pub contests_opened: IntCounter,
    pub votes_committed: IntCounter,
    pub votes_revealed: IntCounter,
    pub events_resolved: IntCounter,
    pub events_voided: IntCounter,
    /// Calls that failed parsing or a protocol check.
    pub actions_rejected: IntCounter,
    /// Accepted transitions undone because persistence failed.
    pub rollbacks: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Events not yet resolved or voided.
    pub open_events: IntGauge,
}

macro_rules! counter {
    ($registry:expr, $name:literal, $help:literal) => {
        register_int_counter_with_registry!(Opts::new($name, $help), $registry)
            .expect(concat!("failed to register ", $name))
    };
}

impl NodeMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let events_submitted =
            counter!(registry, "historia_events_submitted_total", "Root events submitted");
        let contests_opened =
            counter!(registry, "historia_contests_opened_total", "Contest events opened");
        let votes_committed =
            counter!(registry, "historia_votes_committed_total", "Vote commitments accepted");
        let votes_revealed =
            counter!(registry, "historia_votes_revealed_total", "Vote reveals accepted");
        let events_resolved = counter!(
            registry,
            "historia_events_resolved_total",
            "Events resolved with a settlement"
        );
        let events_voided =
            counter!(registry, "historia_events_voided_total", "Events voided without reveals");
        let actions_rejected =
            counter!(registry, "historia_actions_rejected_total", "Protocol calls rejected");
        let rollbacks = counter!(
            registry,
            "historia_rollbacks_total",
            "Transitions rolled back after a failed write"
        );

        let open_events = register_int_gauge_with_registry!(
            Opts::new("historia_open_events", "Events not yet terminal"),
            registry
        )
        .expect("failed to register open_events gauge");

        Self {
            registry,
            events_submitted,
            contests_opened,
            votes_committed,
            votes_revealed,
            events_resolved,
            events_voided,
            actions_rejected,
            rollbacks,
            open_events,
        }
    }

    /// Count an accepted transition.
    pub fn record(&self, effect: &Effect) {
        match effect {
            Effect::Submitted => self.events_submitted.inc(),
            Effect::Contested { .. } => self.contests_opened.inc(),
            Effect::Committed { .. } => self.votes_committed.inc(),
            Effect::Revealed { .. } => self.votes_revealed.inc(),
            Effect::Resolved(Resolution::Resolved(_)) => self.events_resolved.inc(),
            Effect::Resolved(Resolution::Voided(_)) => self.events_voided.inc(),
        }
    }

    pub fn encode(&self) -> Result<String, NodeError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| NodeError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| NodeError::Metrics(e.to_string()))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
