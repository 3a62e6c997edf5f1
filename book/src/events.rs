//! Settlement events
//!
//! Observers are notified after a `move` commits. The commit happens first;
//! a failed commit never reaches an observer, and an observer cannot undo a
//! settlement.

use common::Instruction;

/// Receives settled instructions
pub trait SettlementObserver: Send + Sync {
    /// Called once per successful `move`, after its effects are committed
    fn instruction_settled(&self, instruction: &Instruction);
}

impl<F> SettlementObserver for F
where
    F: Fn(&Instruction) + Send + Sync,
{
    fn instruction_settled(&self, instruction: &Instruction) {
        self(instruction)
    }
}
