//! Transactional key-value substrate for the depo book
//!
//! Wraps RocksDB behind the narrow contract the accounting engines need:
//!
//! - **Composite keys**: namespace + ordered string parts, encoded so that
//!   prefix range scans can be scoped to a namespace and any key-part prefix
//! - **Transactions**: reads through a staged-write overlay, validated
//!   optimistically against read versions and committed as a single atomic
//!   write batch
//! - **History**: every committed write appends a version record, so the
//!   full modification history of any logical key can be replayed

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod error;
pub mod history;
pub mod key;
pub mod storage;
pub mod txn;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use history::{HistoryIter, KeyModification};
pub use key::CompositeKey;
pub use storage::Store;
pub use txn::Transaction;
