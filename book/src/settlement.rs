//! Settlement Engine
//!
//! Applies a bilateral transfer instruction to the Position Store at most
//! once. The full instruction tuple is the idempotency key: once an
//! instruction is stored `executed`, replaying it is a Conflict and touches
//! nothing.

use crate::{
    position::{position_key, read_position},
    types::{PositionValue, INSTRUCTION_NS},
    BookLedger, Error, Result,
};
use common::{Instruction, InstructionKey, InstructionStatus, InstructionValue};
use state_store::CompositeKey;

fn instruction_store_key(key: &InstructionKey) -> Result<Vec<u8>> {
    let quantity = key.quantity.to_string();
    Ok(CompositeKey::new(
        INSTRUCTION_NS,
        &[
            &key.transferer.account,
            &key.transferer.division,
            &key.receiver.account,
            &key.receiver.division,
            &key.security,
            &quantity,
        ],
    )?
    .encode())
}

impl BookLedger {
    /// Settle one transfer instruction (`move`)
    ///
    /// Debits the transferer, credits the receiver (creating the position if
    /// absent), and records the instruction `executed` — all in one atomic
    /// unit. Observers are notified only after the commit.
    pub fn settle(&self, mut instruction: Instruction) -> Result<()> {
        let mut txn = self.store.begin();

        let store_key = instruction_store_key(&instruction.key)?;

        // At-most-once per instruction tuple
        if let Some(bytes) = txn.get(&store_key)? {
            let existing: InstructionValue = serde_json::from_slice(&bytes)?;
            if existing.status == InstructionStatus::Executed {
                return Err(Error::Conflict("Already executed.".to_string()));
            }
        }

        let key = &instruction.key;
        let quantity = key.quantity;

        let from_key = position_key(
            &key.transferer.account,
            &key.transferer.division,
            &key.security,
        )?;
        let mut from = read_position(&txn, &from_key)?
            .ok_or_else(|| Error::NotFound("cannot find position".to_string()))?;

        if from.quantity < quantity {
            return Err(Error::Conflict(
                "cannot move quantity less than current balance".to_string(),
            ));
        }

        from.quantity -= quantity;
        txn.put(from_key, serde_json::to_vec(&from)?);

        let to_key = position_key(
            &key.receiver.account,
            &key.receiver.division,
            &key.security,
        )?;
        let mut to = read_position(&txn, &to_key)?.unwrap_or(PositionValue { quantity: 0 });
        to.quantity = to.quantity.checked_add(quantity).ok_or_else(|| {
            Error::Conflict("cannot move quantity: receiver balance overflow".to_string())
        })?;
        txn.put(to_key, serde_json::to_vec(&to)?);

        instruction.value.status = InstructionStatus::Executed;
        txn.put(store_key, serde_json::to_vec(&instruction.value)?);

        let tx_id = txn.commit()?;

        tracing::info!(
            tx_id = %tx_id,
            transferer = %instruction.key.transferer,
            receiver = %instruction.key.receiver,
            security = %instruction.key.security,
            quantity,
            "Instruction settled"
        );

        self.notify_settled(&instruction);

        Ok(())
    }
}
