//! Core shared types

use serde::{Deserialize, Serialize};
use std::fmt;

/// A holder's account and division at the depository
///
/// Positions, instruction legs, and redeemer designations all identify a
/// holder by this pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Balance {
    /// Depo account
    pub account: String,

    /// Account division
    pub division: String,
}

impl Balance {
    /// Create new balance identity
    pub fn new(account: impl Into<String>, division: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            division: division.into(),
        }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.division)
    }
}
