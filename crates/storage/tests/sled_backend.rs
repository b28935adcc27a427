use custodia_storage::{CacheDb, KvStore, SledKvStore, WriteBatch};
use tempfile::TempDir;

#[test]
fn sled_handles_share_flushed_records() {
    let dir = TempDir::new().unwrap();
    let store = SledKvStore::open(dir.path()).unwrap();
    store.put(b"node", b"record").unwrap();
    store.flush().unwrap();

    let other = store.clone();
    drop(store);
    assert_eq!(other.get(b"node").unwrap(), Some(b"record".to_vec()));
    other.delete(b"node").unwrap();
    assert_eq!(other.get(b"node").unwrap(), None);
}

#[test]
fn sled_batch_is_applied_together() {
    let dir = TempDir::new().unwrap();
    let store = SledKvStore::open(dir.path()).unwrap();
    store.put(b"old", b"1").unwrap();

    let mut batch = WriteBatch::new();
    batch.put(b"a".to_vec(), b"1".to_vec());
    batch.put(b"b".to_vec(), b"2".to_vec());
    batch.delete(b"old".to_vec());
    store.apply(batch).unwrap();

    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    assert_eq!(store.get(b"old").unwrap(), None);
}

#[test]
fn cache_over_sled_commits_or_discards() {
    let dir = TempDir::new().unwrap();
    let store = SledKvStore::open(dir.path()).unwrap();

    let mut discarded = CacheDb::new(&store);
    discarded.put(b"x", b"1");
    drop(discarded);
    assert_eq!(store.get(b"x").unwrap(), None);

    let mut committed = CacheDb::new(&store);
    committed.put(b"x", b"2");
    committed.commit().unwrap();
    assert_eq!(store.get(b"x").unwrap(), Some(b"2".to_vec()));
}
