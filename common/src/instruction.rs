//! Bilateral transfer instructions

use crate::Balance;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Instruction decoding error
#[derive(Error, Debug)]
pub enum InstructionError {
    /// Wrong argument count
    #[error(
        "Incorrect number of arguments. Expecting transferer account, transferer division, \
         receiver account, receiver division, security, quantity, reference, date, reason"
    )]
    ArgumentCount,

    /// Quantity not a non-negative integer
    #[error("Invalid quantity {0:?}")]
    Quantity(String),
}

/// Instruction identity: the full tuple is the key
///
/// Two instructions with the same transferer, receiver, security, and
/// quantity are the same instruction for settlement purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructionKey {
    /// Delivering side
    pub transferer: Balance,

    /// Receiving side
    pub receiver: Balance,

    /// Security id
    pub security: String,

    /// Quantity to move
    pub quantity: u64,
}

/// Instruction settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionStatus {
    /// Recorded but not applied to positions
    Initiated,

    /// Applied to positions; must never be re-applied
    Executed,
}

/// Mutable instruction state plus descriptive fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionValue {
    /// Settlement status
    pub status: InstructionStatus,

    /// Caller-supplied reference
    pub reference: String,

    /// Instruction date as supplied by the caller
    #[serde(rename = "instructionDate")]
    pub instruction_date: String,

    /// Free-text reason
    pub reason: String,
}

/// A requested bilateral transfer of a security quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Identity tuple
    pub key: InstructionKey,

    /// Status and descriptive fields
    pub value: InstructionValue,
}

impl Instruction {
    /// Decode from the positional argument list of a `move` call
    ///
    /// Expects exactly: transferer account, transferer division, receiver
    /// account, receiver division, security, quantity, reference, date,
    /// reason.
    pub fn from_args(args: &[String]) -> Result<Self, InstructionError> {
        if args.len() != 9 {
            return Err(InstructionError::ArgumentCount);
        }

        let quantity: u64 = args[5]
            .parse()
            .map_err(|_| InstructionError::Quantity(args[5].clone()))?;

        Ok(Self {
            key: InstructionKey {
                transferer: Balance::new(&args[0], &args[1]),
                receiver: Balance::new(&args[2], &args[3]),
                security: args[4].clone(),
                quantity,
            },
            value: InstructionValue {
                status: InstructionStatus::Initiated,
                reference: args[6].clone(),
                instruction_date: args[7].clone(),
                reason: args[8].clone(),
            },
        })
    }
}
