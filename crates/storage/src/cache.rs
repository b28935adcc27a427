use crate::{KvStore, WriteBatch};
use anyhow::Result;
use std::collections::BTreeMap;

/// Write-buffering overlay over a [`KvStore`].
///
/// Reads see buffered writes first. Nothing reaches the backend until
/// [`CacheDb::commit`]; dropping the overlay discards every write.
pub struct CacheDb<'a, S: KvStore + ?Sized> {
    store: &'a S,
    overlay: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> CacheDb<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            overlay: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.overlay.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.store.get(key),
        }
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) {
        self.overlay.insert(key.to_vec(), Some(value.to_vec()));
    }

    pub fn delete(&mut self, key: &[u8]) {
        self.overlay.insert(key.to_vec(), None);
    }

    /// Number of keys touched so far.
    pub fn dirty_len(&self) -> usize {
        self.overlay.len()
    }

    pub fn into_batch(self) -> WriteBatch {
        let mut batch = WriteBatch::new();
        for (key, value) in self.overlay {
            match value {
                Some(value) => batch.put(key, value),
                None => batch.delete(key),
            }
        }
        batch
    }

    /// Flush the buffered writes to the backend as one batch.
    pub fn commit(self) -> Result<()> {
        let store = self.store;
        let batch = self.into_batch();
        if batch.is_empty() {
            return Ok(());
        }
        store.apply(batch)
    }
}
