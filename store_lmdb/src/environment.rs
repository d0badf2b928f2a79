//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use historia_store::{MetaStore, StoreError, SCHEMA_VERSION};

use crate::LmdbError;

const MAX_DBS: u32 = 3;

/// Default map size: 1 GiB.
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

/// The LMDB environment and all database handles.
pub struct LmdbStore {
    pub(crate) env: Arc<Env>,
    pub(crate) events_db: Database<Bytes, Bytes>,
    pub(crate) credits_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create the environment at `path` and check its schema version.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path).map_err(LmdbError::from)?;
        // SAFETY: the node is the only process that opens this directory.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)
        }
        .map_err(LmdbError::from)?;

        let mut wtxn = env.write_txn().map_err(LmdbError::from)?;
        let events_db = env
            .create_database(&mut wtxn, Some("events"))
            .map_err(LmdbError::from)?;
        let credits_db = env
            .create_database(&mut wtxn, Some("credits"))
            .map_err(LmdbError::from)?;
        let meta_db = env
            .create_database(&mut wtxn, Some("meta"))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        let store = Self {
            env: Arc::new(env),
            events_db,
            credits_db,
            meta_db,
        };
        store.check_schema()?;
        tracing::info!(path = %path.display(), map_size, "opened LMDB store");
        Ok(store)
    }

    fn check_schema(&self) -> Result<(), StoreError> {
        match self.schema_version()? {
            0 => self.set_schema_version(SCHEMA_VERSION),
            v if v == SCHEMA_VERSION => Ok(()),
            found => Err(StoreError::SchemaMismatch {
                found,
                expected: SCHEMA_VERSION,
            }),
        }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}
