//! Background sweep that resolves events once their reveal window closes.
//!
//! Resolution is permissionless; the keeper simply submits `Resolve` calls
//! under its own address so that nobody has to remember to.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

use historia_adjudication::ErrorKind;
use historia_types::{Address, Amount, EventId};

use crate::action::ProtocolCall;
use crate::node::HistoriaNode;
use crate::shutdown::ShutdownSignal;
use crate::tracing_spans::keeper_span;
use crate::NodeError;

pub struct Keeper {
    node: Arc<HistoriaNode>,
    caller: Address,
    interval: Duration,
}

impl Keeper {
    pub fn new(node: Arc<HistoriaNode>) -> Self {
        let caller = node.config().keeper_address.clone();
        let interval = Duration::from_secs(node.config().keeper_interval_secs.max(1));
        Self {
            node,
            caller,
            interval,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Resolve every due event once. Returns the ids that were resolved.
    ///
    /// An event resolved by someone else between the scan and the call is
    /// skipped. Any other failure is logged and the sweep moves on.
    pub async fn tick(&self) -> Vec<EventId> {
        let due = self.node.due_for_resolution().await;
        if due.is_empty() {
            return Vec::new();
        }
        let span = keeper_span(due.len());
        async {
            let mut resolved = Vec::with_capacity(due.len());
            for id in due {
                let call = ProtocolCall::new(
                    self.caller.clone(),
                    Amount::ZERO,
                    "Resolve",
                    [id.to_string()],
                );
                match self.node.execute(call).await {
                    Ok(_) => resolved.push(id),
                    Err(e) if is_already_resolved(&e) => {
                        debug!(event = %id, "already resolved");
                    }
                    Err(e) => warn!(event = %id, error = %e, "keeper failed to resolve"),
                }
            }
            info!(resolved = resolved.len(), "keeper sweep done");
            resolved
        }
        .instrument(span)
        .await
    }

    /// Run [`tick`](Self::tick) on an interval until shutdown is signalled.
    /// A sweep in progress finishes before the task exits.
    pub fn spawn(self, mut shutdown: ShutdownSignal) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick().await;
                    }
                    _ = shutdown.stopped() => {
                        info!("keeper stopping");
                        break;
                    }
                }
            }
        })
    }
}

fn is_already_resolved(e: &NodeError) -> bool {
    e.protocol_kind() == Some(ErrorKind::AlreadyResolved)
}
