//! Position Store operations

use crate::{
    types::{Position, PositionValue, BOOK_NS},
    BookLedger, Error, Result,
};
use common::Balance;
use serde::Deserialize;
use state_store::{CompositeKey, Transaction};

/// Storable key of one position
pub(crate) fn position_key(account: &str, division: &str, security: &str) -> Result<Vec<u8>> {
    Ok(CompositeKey::new(BOOK_NS, &[account, division, security])?.encode())
}

pub(crate) fn read_position(txn: &Transaction, key: &[u8]) -> Result<Option<PositionValue>> {
    match txn.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

impl BookLedger {
    /// Unconditionally overwrite one position's quantity
    ///
    /// Callers are responsible for what they write; the only validation is
    /// that the quantity parsed as a non-negative integer.
    pub fn put(&self, account: &str, division: &str, security: &str, quantity: u64) -> Result<()> {
        let mut txn = self.store.begin();
        txn.put(
            position_key(account, division, security)?,
            serde_json::to_vec(&PositionValue { quantity })?,
        );
        txn.commit()?;

        tracing::debug!(account, division, security, quantity, "Position put");
        Ok(())
    }

    /// Verify a position exists and holds at least `quantity`; no mutation
    pub fn check(
        &self,
        account: &str,
        division: &str,
        security: &str,
        quantity: u64,
    ) -> Result<()> {
        let txn = self.store.begin();
        let value = read_position(&txn, &position_key(account, division, security)?)?
            .ok_or_else(|| Error::NotFound("cannot find position".to_string()))?;

        if value.quantity < quantity {
            return Err(Error::Conflict(
                "quantity less than current balance".to_string(),
            ));
        }

        Ok(())
    }

    /// Scan all positions, optionally restricted to one security
    ///
    /// Unbounded result; callers get every matching position in store key
    /// order.
    pub fn find(&self, security: Option<&str>) -> Result<Vec<Position>> {
        let txn = self.store.begin();
        self.find_in(&txn, security)
    }

    /// `find` through an open transaction, so an operation sees its own
    /// staged writes
    pub(crate) fn find_in(
        &self,
        txn: &Transaction,
        security: Option<&str>,
    ) -> Result<Vec<Position>> {
        let prefix = CompositeKey::prefix(BOOK_NS, &[])?;

        let mut positions = Vec::new();
        for (key, value) in txn.scan_prefix(&prefix)? {
            let key = CompositeKey::decode(&key)?;
            let [account, division, sec] = key.parts.as_slice() else {
                return Err(Error::Store(state_store::Error::Key(format!(
                    "position key with {} parts",
                    key.parts.len()
                ))));
            };

            if security.is_some_and(|filter| filter != sec.as_str()) {
                continue;
            }

            let value: PositionValue = serde_json::from_slice(&value)?;
            positions.push(Position {
                balance: Balance::new(account, division),
                security: sec.clone(),
                quantity: value.quantity,
            });
        }

        Ok(positions)
    }

    /// Bulk initial load from a JSON array of position records
    ///
    /// Each record is applied as a `put`; all of them commit together.
    pub fn init(&self, positions_json: &str) -> Result<()> {
        #[derive(Deserialize)]
        struct PositionInit {
            account: String,
            division: String,
            security: String,
            quantity: String,
        }

        let inits: Vec<PositionInit> = serde_json::from_str(positions_json)
            .map_err(|e| Error::Validation(format!("Invalid init payload: {}", e)))?;

        let mut txn = self.store.begin();
        for init in &inits {
            let quantity: u64 = init
                .quantity
                .parse()
                .map_err(|_| Error::Validation(format!("Invalid quantity {:?}", init.quantity)))?;
            txn.put(
                position_key(&init.account, &init.division, &init.security)?,
                serde_json::to_vec(&PositionValue { quantity })?,
            );
        }
        txn.commit()?;

        tracing::info!(positions = inits.len(), "Book initialized");
        Ok(())
    }
}
