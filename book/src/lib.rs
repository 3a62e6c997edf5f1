//! Securities position book
//!
//! Key-value backed accounting for per-holder balances of tradable
//! securities:
//!
//! - **Position Store**: one quantity per (account, division, security)
//! - **Settlement Engine**: applies bilateral transfer instructions exactly
//!   once (`move`)
//! - **Redemption Engine**: drains every holder of a security into the
//!   registry-designated redeemer, once per security, with an audit trail
//! - **History Reader**: replays every committed version of a position
//!
//! Every operation runs as one atomic unit against the store: all reads and
//! writes go through a single transaction, and a failure at any step leaves
//! nothing visible.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod dispatch;
pub mod error;
pub mod events;
pub mod history;
pub mod ledger;
pub mod position;
pub mod redemption;
pub mod settlement;
pub mod types;

#[cfg(test)]
pub(crate) mod test_util;

// Re-exports
pub use error::{Error, Result};
pub use events::SettlementObserver;
pub use ledger::BookLedger;
pub use types::{Position, PositionValue, RedeemInstruction, RedeemRecord};
