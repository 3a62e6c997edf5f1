//! Staged-write transactions
//!
//! A transaction buffers every write in an overlay and reads through it, so
//! an operation sees its own uncommitted effects but nothing leaks out until
//! `commit` flushes the whole overlay as a single RocksDB write batch. A
//! dropped transaction commits nothing.
//!
//! Concurrency is optimistic: every committed-state read records the key's
//! version, and `commit` re-checks those versions under the commit lock.
//! If another transaction committed to a read key in between, the commit
//! fails with [`Error::WriteConflict`] and nothing is written.

use crate::{
    history::StoredModification,
    storage::{CF_HISTORY, CF_STATE},
    Error, Result, Store,
};
use chrono::Utc;
use parking_lot::Mutex;
use rocksdb::WriteBatch;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// An atomic unit of reads and writes against the store
pub struct Transaction {
    store: Arc<Store>,

    /// Staged writes; `None` marks a staged deletion
    staged: BTreeMap<Vec<u8>, Option<Vec<u8>>>,

    /// Version of each committed key this transaction has read, as first
    /// observed. Validated against the store at commit.
    reads: Mutex<BTreeMap<Vec<u8>, u64>>,
}

impl Transaction {
    pub(crate) fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            staged: BTreeMap::new(),
            reads: Mutex::new(BTreeMap::new()),
        }
    }

    /// Read a key: staged writes first, then committed state
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(staged) = self.staged.get(key) {
            return Ok(staged.clone());
        }

        // Version and value must come from the same committed state
        let _guard = self.store.commit_lock.lock();
        let version = self.store.version_count(key)?;
        let value = self.store.get(key)?;
        self.reads.lock().entry(key.to_vec()).or_insert(version);
        Ok(value)
    }

    /// Stage a write
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.staged.insert(key, Some(value));
    }

    /// Stage a deletion
    pub fn delete(&mut self, key: Vec<u8>) {
        self.staged.insert(key, None);
    }

    /// Scan by key prefix, merging staged writes over committed state
    ///
    /// Each committed key returned joins the read set; keys inserted after
    /// the scan are not tracked.
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let committed = {
            let _guard = self.store.commit_lock.lock();
            let committed = self.store.scan_prefix(prefix)?;
            let mut reads = self.reads.lock();
            for (key, _) in &committed {
                let version = self.store.version_count(key)?;
                reads.entry(key.clone()).or_insert(version);
            }
            committed
        };

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = committed.into_iter().collect();

        for (key, staged) in self.staged.range(prefix.to_vec()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match staged {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }

    /// Commit every staged write atomically
    ///
    /// Re-validates every read key's version first; a version bump means
    /// another transaction committed in between and this one must be retried
    /// from scratch. On success, assigns one transaction id and timestamp,
    /// and appends a history record per written key in the same batch as the
    /// state writes.
    pub fn commit(self) -> Result<Uuid> {
        let tx_id = Uuid::now_v7();

        if self.staged.is_empty() {
            return Ok(tx_id);
        }

        let timestamp = Utc::now();
        let cf_state = self.store.cf_handle(CF_STATE)?;
        let cf_history = self.store.cf_handle(CF_HISTORY)?;

        // Version numbering and read validation must not interleave with
        // another commit
        let _guard = self.store.commit_lock.lock();

        for (key, version) in self.reads.into_inner() {
            if self.store.version_count(&key)? != version {
                return Err(Error::WriteConflict(
                    String::from_utf8_lossy(&key).into_owned(),
                ));
            }
        }

        let mut batch = WriteBatch::default();

        for (key, staged) in &self.staged {
            match staged {
                Some(value) => batch.put_cf(cf_state, key, value),
                None => batch.delete_cf(cf_state, key),
            }

            let version = self.store.version_count(key)?;
            let record = StoredModification {
                tx_id: tx_id.to_string(),
                timestamp,
                is_delete: staged.is_none(),
                value: staged.clone(),
            };
            batch.put_cf(
                cf_history,
                Store::history_key(key, version),
                serde_json::to_vec(&record)?,
            );
        }

        self.store.db.write(batch)?;

        tracing::debug!(
            tx_id = %tx_id,
            keys = self.staged.len(),
            "Transaction committed"
        );

        Ok(tx_id)
    }
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("staged", &self.staged.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use tempfile::TempDir;

    fn test_store() -> (Arc<Store>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = temp_dir.path().to_path_buf();
        (Arc::new(Store::open(&config).unwrap()), temp_dir)
    }

    #[test]
    fn test_reads_see_own_staged_writes() {
        let (store, _temp) = test_store();

        let mut txn = store.begin();
        txn.put(b"k".to_vec(), b"1".to_vec());
        assert_eq!(txn.get(b"k").unwrap(), Some(b"1".to_vec()));

        txn.delete(b"k".to_vec());
        assert_eq!(txn.get(b"k").unwrap(), None);
    }

    #[test]
    fn test_scan_merges_overlay() {
        let (store, _temp) = test_store();

        let mut txn = store.begin();
        txn.put(b"p/1".to_vec(), b"1".to_vec());
        txn.commit().unwrap();

        let mut txn = store.begin();
        txn.put(b"p/2".to_vec(), b"2".to_vec());
        txn.delete(b"p/1".to_vec());

        let entries = txn.scan_prefix(b"p/").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, b"p/2".to_vec());
    }

    #[test]
    fn test_commit_is_all_or_nothing_per_batch() {
        let (store, _temp) = test_store();

        let mut txn = store.begin();
        txn.put(b"a".to_vec(), b"1".to_vec());
        txn.put(b"b".to_vec(), b"2".to_vec());
        txn.commit().unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_commit_rejects_stale_read() {
        let (store, _temp) = test_store();

        let mut txn = store.begin();
        txn.put(b"k".to_vec(), b"1".to_vec());
        txn.commit().unwrap();

        let mut first = store.begin();
        let mut second = store.begin();
        assert_eq!(first.get(b"k").unwrap(), Some(b"1".to_vec()));
        assert_eq!(second.get(b"k").unwrap(), Some(b"1".to_vec()));

        first.put(b"k".to_vec(), b"2".to_vec());
        first.commit().unwrap();

        // The second transaction read a version that no longer exists
        second.put(b"k".to_vec(), b"3".to_vec());
        let err = second.commit().unwrap_err();
        assert!(matches!(err, Error::WriteConflict(_)));
        assert_eq!(store.get(b"k").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_commit_rejects_stale_scan() {
        let (store, _temp) = test_store();

        let mut txn = store.begin();
        txn.put(b"p/1".to_vec(), b"1".to_vec());
        txn.commit().unwrap();

        let mut second = store.begin();
        assert_eq!(second.scan_prefix(b"p/").unwrap().len(), 1);

        let mut first = store.begin();
        first.put(b"p/1".to_vec(), b"2".to_vec());
        first.commit().unwrap();

        second.put(b"p/2".to_vec(), b"x".to_vec());
        assert!(matches!(
            second.commit().unwrap_err(),
            Error::WriteConflict(_)
        ));
    }

    #[test]
    fn test_disjoint_reads_do_not_conflict() {
        let (store, _temp) = test_store();

        let mut txn = store.begin();
        txn.put(b"a".to_vec(), b"1".to_vec());
        txn.put(b"b".to_vec(), b"1".to_vec());
        txn.commit().unwrap();

        let mut first = store.begin();
        let mut second = store.begin();
        first.get(b"a").unwrap();
        second.get(b"b").unwrap();

        first.put(b"a".to_vec(), b"2".to_vec());
        first.commit().unwrap();

        second.put(b"b".to_vec(), b"2".to_vec());
        second.commit().unwrap();
    }

    #[test]
    fn test_blind_put_never_conflicts() {
        let (store, _temp) = test_store();

        let mut first = store.begin();
        let mut second = store.begin();
        first.put(b"k".to_vec(), b"1".to_vec());
        second.put(b"k".to_vec(), b"2".to_vec());

        // No reads recorded, so the later writer simply wins
        first.commit().unwrap();
        second.commit().unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn test_each_commit_gets_one_version() {
        let (store, _temp) = test_store();

        for _ in 0..3 {
            let mut txn = store.begin();
            txn.put(b"k".to_vec(), b"\"v\"".to_vec());
            txn.commit().unwrap();
        }

        assert_eq!(store.version_count(b"k").unwrap(), 3);
    }
}
