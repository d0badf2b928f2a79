//! Stop signal shared by the daemon and the keeper.
//!
//! The state is a `tokio::sync::watch` flag rather than a one-shot message,
//! so a task subscribed after the stop was requested still observes it.

use tokio::sync::watch;
use tracing::{info, warn};

pub struct ShutdownController {
    tx: watch::Sender<bool>,
}

/// Receiving half held by background tasks.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Ask every subscriber to stop. Idempotent.
    pub fn shutdown(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.tx.borrow()
    }

    /// Block until SIGINT or SIGTERM, then stop the keeper and the node.
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(e) => {
                    warn!(error = %e, "SIGTERM handler unavailable");
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            res = tokio::signal::ctrl_c() => match res {
                Ok(()) => info!("SIGINT received, stopping Historia node"),
                Err(e) => warn!(error = %e, "SIGINT handler failed, stopping Historia node"),
            },
            _ = terminate => info!("SIGTERM received, stopping Historia node"),
        }
        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolves once shutdown has been requested, or the controller is gone.
    pub async fn stopped(&mut self) {
        // An error means the controller was dropped, which also means stop.
        let _ = self.rx.wait_for(|stop| *stop).await;
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}
