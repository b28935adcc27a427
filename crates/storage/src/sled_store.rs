use crate::{KvStore, StorageError, WriteBatch, WriteOp};
use anyhow::Result;
use sled::{Db, Tree};
use std::path::Path;

const CONTRACT_TREE: &str = "contract_state";

/// Sled-backed durable store. Clones share the same database handle.
#[derive(Clone)]
pub struct SledKvStore {
    db: Db,
    state: Tree,
}

impl SledKvStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).map_err(StorageError::from)?;
        let state = db.open_tree(CONTRACT_TREE).map_err(StorageError::from)?;
        tracing::info!(entries = state.len(), "Opened contract state tree");
        Ok(Self { db, state })
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().map_err(StorageError::from)?;
        Ok(())
    }
}

impl KvStore for SledKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self
            .state
            .get(key)
            .map_err(StorageError::from)?
            .map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.state.insert(key, value).map_err(StorageError::from)?;
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.state.remove(key).map_err(StorageError::from)?;
        Ok(())
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        let mut sled_batch = sled::Batch::default();
        let count = batch.len();
        for op in batch.ops {
            match op {
                WriteOp::Put(key, value) => sled_batch.insert(key, value),
                WriteOp::Delete(key) => sled_batch.remove(key),
            }
        }
        self.state
            .apply_batch(sled_batch)
            .map_err(StorageError::from)?;
        tracing::debug!(ops = count, "Applied write batch");
        Ok(())
    }
}
