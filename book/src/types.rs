//! Book types

use common::Balance;
use serde::{Deserialize, Serialize};

/// Composite-key namespace for positions
pub(crate) const BOOK_NS: &str = "Book";

/// Composite-key namespace for settled instructions
pub(crate) const INSTRUCTION_NS: &str = "Instruction";

/// Composite-key namespace for redemption records
pub(crate) const REDEEM_NS: &str = "Redeem";

/// Stored value of a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionValue {
    /// Held quantity; never negative
    pub quantity: u64,
}

/// A holder's position in one security, reconstructed from key parts plus
/// value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Holder identity
    pub balance: Balance,

    /// Security id
    pub security: String,

    /// Held quantity
    pub quantity: u64,
}

/// One leg of a redemption's audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeemInstruction {
    /// Drained holder
    pub transferer: Balance,

    /// Redeemer position credited
    pub receiver: Balance,

    /// Security id
    pub security: String,

    /// Drained quantity (the holder's entire balance at scan time)
    pub quantity: u64,

    /// Always `redeem`
    pub reference: String,

    /// Wall-clock date the redemption ran
    #[serde(rename = "instructionDate")]
    pub instruction_date: String,

    /// Caller-supplied reason
    pub reason: String,
}

/// The write-once audit record of one security's redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRecord {
    /// Security id
    pub security: String,

    /// Audit entries, one per drained holder
    pub instructions: Vec<RedeemInstruction>,
}
