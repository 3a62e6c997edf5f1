//! History Reader
//!
//! Replays every committed version of one position, oldest first. The
//! sequence is lazy and forward-only; each call replays from the first
//! version.

use crate::{position::position_key, BookLedger, Result};
use state_store::HistoryIter;

impl BookLedger {
    /// Replay the version history of one position (`history`)
    pub fn history(
        &self,
        account: &str,
        division: &str,
        security: &str,
    ) -> Result<HistoryIter<'_>> {
        let key = position_key(account, division, security)?;
        Ok(self.store.history(&key)?)
    }
}
