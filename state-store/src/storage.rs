//! Storage layer using RocksDB
//!
//! # Column Families
//!
//! - `state` - Current committed value per key
//! - `history` - Append-only version log (key: state key || version)

use crate::{
    error::{Error, Result},
    history::HistoryIter,
    txn::Transaction,
    Config,
};
use parking_lot::Mutex;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, DB};
use std::sync::Arc;

/// Column family names
pub(crate) const CF_STATE: &str = "state";
pub(crate) const CF_HISTORY: &str = "history";

/// Width of the big-endian version suffix on history keys
pub(crate) const VERSION_SUFFIX_LEN: usize = 8;

/// Storage wrapper for RocksDB
pub struct Store {
    pub(crate) db: Arc<DB>,

    /// Serializes commits so version numbers stay dense per key
    pub(crate) commit_lock: Mutex<()>,
}

impl Store {
    /// Open or create database
    pub fn open(config: &Config) -> Result<Self> {
        let path = &config.data_dir;

        // Create directory if not exists
        std::fs::create_dir_all(path)?;

        // Database options
        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);

        // Tuning from config
        db_opts.set_write_buffer_size(config.rocksdb.write_buffer_size_mb * 1024 * 1024);
        db_opts.set_max_write_buffer_number(config.rocksdb.max_write_buffer_number);
        db_opts.set_max_background_jobs(config.rocksdb.max_background_jobs);

        if config.rocksdb.enable_statistics {
            db_opts.enable_statistics();
        }

        // Column family descriptors
        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_STATE, Self::cf_options_state()),
            ColumnFamilyDescriptor::new(CF_HISTORY, Self::cf_options_history()),
        ];

        // Open database
        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)?;

        tracing::info!("Opened RocksDB at {:?}", path);

        Ok(Self {
            db: Arc::new(db),
            commit_lock: Mutex::new(()),
        })
    }

    // Column family options

    fn cf_options_state() -> Options {
        let mut opts = Options::default();
        // State is frequently read, use LZ4 for speed
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf_options_history() -> Options {
        let mut opts = Options::default();
        // Append-only, read rarely
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
        opts.set_bottommost_compression_type(rocksdb::DBCompressionType::Zstd);
        opts
    }

    // Helper: get column family handle

    pub(crate) fn cf_handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| Error::Storage(format!("Column family {} not found", name)))
    }

    /// Get the committed value for a key
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.cf_handle(CF_STATE)?;
        Ok(self.db.get_cf(cf, key)?)
    }

    /// Scan committed state by key prefix, in key order
    pub fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let cf = self.cf_handle(CF_STATE)?;

        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward));

        let mut entries = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            entries.push((key.to_vec(), value.to_vec()));
        }

        Ok(entries)
    }

    /// Begin a transaction
    ///
    /// Reads see committed state plus this transaction's own staged writes;
    /// nothing becomes visible to other readers until `commit`.
    pub fn begin(self: &Arc<Self>) -> Transaction {
        Transaction::new(self.clone())
    }

    /// Number of committed versions for a key
    pub(crate) fn version_count(&self, key: &[u8]) -> Result<u64> {
        let cf = self.cf_handle(CF_HISTORY)?;

        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(key, Direction::Forward));

        let mut count = 0u64;
        for item in iter {
            let (hkey, _) = item?;
            if !hkey.starts_with(key) {
                break;
            }
            // Skip longer keys that merely share this one as a prefix
            if hkey.len() == key.len() + VERSION_SUFFIX_LEN {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Replay the full version history of a key, oldest first
    ///
    /// Lazy and forward-only; each call starts over from the first version.
    pub fn history(&self, key: &[u8]) -> Result<HistoryIter<'_>> {
        let cf = self.cf_handle(CF_HISTORY)?;

        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(key, Direction::Forward));

        Ok(HistoryIter::new(iter, key.to_vec()))
    }

    /// History key: state key || big-endian version
    pub(crate) fn history_key(key: &[u8], version: u64) -> Vec<u8> {
        let mut hkey = key.to_vec();
        hkey.extend_from_slice(&version.to_be_bytes());
        hkey
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
