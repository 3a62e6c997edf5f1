//! Redemption Engine
//!
//! Drains every holder of a security into the registry-designated redeemer
//! position, exactly once per security. The write-once redemption record is
//! both the audit trail and the guard against a second redemption.

use crate::{
    position::{position_key, read_position},
    types::{PositionValue, RedeemInstruction, RedeemRecord, REDEEM_NS},
    BookLedger, Error, Result,
};
use chrono::Utc;
use state_store::CompositeKey;

impl BookLedger {
    /// Redeem one security (`redeem`)
    ///
    /// Resolves the redeemer from the Security Registry, scans every
    /// position in the security, drains each non-redeemer holder's entire
    /// balance into the redeemer, and records one audit entry per holder.
    /// Holder debits are staged as the scan is processed; the redeemer
    /// credit and the redemption record are staged once at the end, and the
    /// whole operation commits atomically.
    pub fn redeem(&self, security: &str, reason: &str) -> Result<()> {
        let record_key = CompositeKey::new(REDEEM_NS, &[security])?.encode();

        let mut txn = self.store.begin();

        // Exactly-once per security, for the life of the ledger
        if txn.get(&record_key)?.is_some() {
            return Err(Error::Conflict("Security already redeemed.".to_string()));
        }

        let terms = self.lookup.find_terms(security)?;
        let redeemer = terms.redeem;

        let positions = self.find_in(&txn, Some(security))?;

        let redeemer_key = position_key(&redeemer.account, &redeemer.division, security)?;
        let mut accumulated = read_position(&txn, &redeemer_key)?
            .unwrap_or(PositionValue { quantity: 0 })
            .quantity;

        let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let mut instructions = Vec::new();

        for position in positions {
            if position.balance == redeemer {
                continue;
            }

            let holder_key = position_key(
                &position.balance.account,
                &position.balance.division,
                security,
            )?;
            let mut holder = read_position(&txn, &holder_key)?
                .ok_or_else(|| Error::NotFound("cannot find position".to_string()))?;

            // The scan snapshot is both the amount checked and the amount
            // moved: the holder is drained to zero
            if holder.quantity < position.quantity {
                return Err(Error::Conflict(
                    "cannot move quantity less than current balance".to_string(),
                ));
            }

            holder.quantity -= position.quantity;
            txn.put(holder_key, serde_json::to_vec(&holder)?);

            accumulated = accumulated.checked_add(position.quantity).ok_or_else(|| {
                Error::Conflict("cannot redeem: redeemer balance overflow".to_string())
            })?;

            instructions.push(RedeemInstruction {
                transferer: position.balance,
                receiver: redeemer.clone(),
                security: security.to_string(),
                quantity: position.quantity,
                reference: "redeem".to_string(),
                instruction_date: now.clone(),
                reason: reason.to_string(),
            });
        }

        txn.put(
            redeemer_key,
            serde_json::to_vec(&PositionValue {
                quantity: accumulated,
            })?,
        );
        txn.put(record_key, serde_json::to_vec(&instructions)?);

        let tx_id = txn.commit()?;

        tracing::info!(
            tx_id = %tx_id,
            security,
            redeemer = %redeemer,
            holders = instructions.len(),
            total = accumulated,
            "Security redeemed"
        );

        Ok(())
    }

    /// Return redemption records matching a composite-key prefix
    /// (`redeemHistory`)
    ///
    /// With no parts this lists every redeemed security; with one part it
    /// narrows to that security id.
    pub fn redeem_history(&self, parts: &[String]) -> Result<Vec<RedeemRecord>> {
        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        let prefix = CompositeKey::prefix(REDEEM_NS, &parts)?;

        let mut records = Vec::new();
        for (key, value) in self.store.scan_prefix(&prefix)? {
            let key = CompositeKey::decode(&key)?;
            let security = key.parts.first().ok_or_else(|| {
                Error::Store(state_store::Error::Key(
                    "redeem key without security part".to_string(),
                ))
            })?;
            let instructions: Vec<RedeemInstruction> = serde_json::from_slice(&value)?;
            records.push(RedeemRecord {
                security: security.clone(),
                instructions,
            });
        }

        Ok(records)
    }
}
