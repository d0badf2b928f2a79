//! Historia node: hosts the event registry and credit ledger behind a
//! single writer.
//!
//! The node:
//! - Parses protocol calls delivered by the hosting ledger into actions
//! - Applies them to the registry with one clock reading per call
//! - Credits settlements and persists every accepted transition atomically
//! - Rolls the in-memory state back when a write fails
//! - Runs a keeper that resolves events whose reveal window has elapsed

pub mod action;
pub mod config;
pub mod error;
pub mod keeper;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod shutdown;
pub mod tracing_spans;

pub use action::{Action, ProtocolCall};
pub use config::{NodeConfig, StorageBackend};
pub use error::NodeError;
pub use keeper::Keeper;
pub use logging::{init_logging, LogFormat};
pub use metrics::NodeMetrics;
pub use node::{HistoriaNode, Receipt};
pub use shutdown::{ShutdownController, ShutdownSignal};
