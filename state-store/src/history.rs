//! Per-key version history
//!
//! Every committed write appends one record to the `history` column family
//! under `state key || big-endian version`. Replaying a key yields its
//! committed versions oldest-first, each carrying the transaction id, the
//! decoded value (or nothing for a deletion), a timestamp, and the deletion
//! flag.

use crate::{
    storage::VERSION_SUFFIX_LEN,
    Error, Result,
};
use chrono::{DateTime, Utc};
use rocksdb::{DBIteratorWithThreadMode, DB};
use serde::{Deserialize, Serialize};

/// One committed version of a logical key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyModification {
    /// Transaction that committed this version
    #[serde(rename = "txId")]
    pub tx_id: String,

    /// Decoded value; `None` when this version was a deletion
    pub value: Option<serde_json::Value>,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,

    /// Whether this version deleted the key
    #[serde(rename = "isDelete")]
    pub is_delete: bool,
}

/// On-disk shape of a history record; value bytes stay undecoded until read
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StoredModification {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    pub is_delete: bool,
    pub value: Option<Vec<u8>>,
}

impl StoredModification {
    fn decode(self) -> Result<KeyModification> {
        let value = match self.value {
            Some(bytes) => Some(serde_json::from_slice(&bytes)?),
            None => None,
        };
        Ok(KeyModification {
            tx_id: self.tx_id,
            value,
            timestamp: self.timestamp,
            is_delete: self.is_delete,
        })
    }
}

/// Lazy, finite, forward-only replay of one key's versions
pub struct HistoryIter<'a> {
    iter: DBIteratorWithThreadMode<'a, DB>,
    key: Vec<u8>,
    done: bool,
}

impl<'a> HistoryIter<'a> {
    pub(crate) fn new(iter: DBIteratorWithThreadMode<'a, DB>, key: Vec<u8>) -> Self {
        Self {
            iter,
            key,
            done: false,
        }
    }
}

impl Iterator for HistoryIter<'_> {
    type Item = Result<KeyModification>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let item = match self.iter.next()? {
                Ok(item) => item,
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::from(e)));
                }
            };

            let (hkey, value) = item;
            if !hkey.starts_with(&self.key) {
                self.done = true;
                return None;
            }
            // Longer state keys sharing this one as a byte prefix
            if hkey.len() != self.key.len() + VERSION_SUFFIX_LEN {
                continue;
            }

            let record: StoredModification = match serde_json::from_slice(&value) {
                Ok(record) => record,
                Err(e) => {
                    self.done = true;
                    return Some(Err(Error::from(e)));
                }
            };

            return Some(record.decode());
        }
    }
}

impl std::fmt::Debug for HistoryIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryIter")
            .field("key", &self.key)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
