//! Invoking caller identity
//!
//! The substrate authenticates callers; operations that are restricted (the
//! registry's calendar-entry submission) check the caller's organizational
//! affiliation, not a per-user identity.

use serde::{Deserialize, Serialize};

/// The identity an operation was invoked under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Organization the caller's credentials belong to
    pub organization: String,
}

impl CallerIdentity {
    /// Create new caller identity
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
        }
    }
}
