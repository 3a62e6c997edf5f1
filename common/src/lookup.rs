//! Typed cross-contract lookup
//!
//! In the deployed system the book and the registry are separate contracts;
//! the Redemption Engine fetches the redeemer designation for a security
//! through a synchronous invocation of the registry. That call is modeled
//! here as an explicit trait with a typed response instead of a dynamic
//! invocation by name.

use crate::Balance;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lookup failure
#[derive(Error, Debug)]
pub enum LookupError {
    /// The security is not registered
    #[error("Security not found: {0}")]
    NotFound(String),

    /// The registry could not be reached or answered malformed
    #[error("Security lookup failed: {0}")]
    Unavailable(String),
}

/// The registry-side terms of a security relevant to the book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityTerms {
    /// Current status (free-form; `matured` is terminal)
    pub status: String,

    /// Designated redeemer position for this security
    pub redeem: Balance,
}

/// Resolver for security terms
pub trait SecurityLookup: Send + Sync {
    /// Fetch the terms of one security
    fn find_terms(&self, security: &str) -> Result<SecurityTerms, LookupError>;
}
