//! Shared domain types for the depo book
//!
//! Types used on both sides of the book/registry boundary: holder balances,
//! transfer instructions, the invoking caller's identity, and the typed
//! lookup contract the Redemption Engine uses to reach the Security
//! Registry.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod identity;
pub mod instruction;
pub mod lookup;
pub mod types;

// Re-exports
pub use identity::CallerIdentity;
pub use instruction::{
    Instruction, InstructionError, InstructionKey, InstructionStatus, InstructionValue,
};
pub use lookup::{LookupError, SecurityLookup, SecurityTerms};
pub use types::Balance;
