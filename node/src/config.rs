//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use historia_types::{Address, ProtocolParams};

use crate::logging::LogFormat;
use crate::NodeError;

/// Where the ledger lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Nothing survives a restart.
    Memory,
    Lmdb,
}

/// Configuration for a Historia node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for ledger storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,

    /// Whether to run the background task that resolves due events.
    #[serde(default = "default_true")]
    pub enable_keeper: bool,

    #[serde(default = "default_keeper_interval_secs")]
    pub keeper_interval_secs: u64,

    /// Caller identity the keeper resolves events as.
    #[serde(default = "default_keeper_address")]
    pub keeper_address: Address,

    #[serde(default)]
    pub params: ProtocolParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./historia_data")
}

fn default_storage() -> StorageBackend {
    StorageBackend::Lmdb
}

fn default_lmdb_map_size() -> usize {
    historia_store_lmdb::environment::DEFAULT_MAP_SIZE
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_keeper_interval_secs() -> u64 {
    30
}

fn default_keeper_address() -> Address {
    Address::from_static("historia_keeper")
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        self.params
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// In-memory config for tests and one-off runs.
    pub fn ephemeral() -> Self {
        Self {
            storage: StorageBackend::Memory,
            enable_keeper: false,
            ..Self::default()
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: default_storage(),
            lmdb_map_size: default_lmdb_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
            enable_keeper: default_true(),
            keeper_interval_secs: default_keeper_interval_secs(),
            keeper_address: default_keeper_address(),
            params: ProtocolParams::default(),
        }
    }
}
