//! Registry types

use common::Balance;
use serde::{Deserialize, Serialize};

/// Composite-key namespace for securities
pub(crate) const SECURITY_NS: &str = "Security";

/// Calendar-entry code that matures a security
pub const MATURITY_ENTRY_CODE: &str = "MCAL";

/// Terminal security status reached on maturity
pub const MATURED_STATUS: &str = "matured";

/// A dated event on a security's corporate-action calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Event date
    pub date: String,

    /// Event code (`MCAL` matures the security)
    pub code: String,

    /// Free-text description
    pub text: String,

    /// External reference
    pub reference: String,
}

/// Stored value of a security
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityValue {
    /// Current status; free-form except the terminal `matured`
    pub status: String,

    /// Append-only calendar, oldest first
    pub entries: Vec<CalendarEntry>,

    /// Designated redeemer position
    pub redeem: Balance,
}

/// A security with its identity, as returned to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    /// Security id
    pub security: String,

    /// Current status
    pub status: String,

    /// Calendar entries, oldest first
    pub entries: Vec<CalendarEntry>,

    /// Designated redeemer position
    pub redeem: Balance,
}

impl Security {
    pub(crate) fn from_value(security: impl Into<String>, value: SecurityValue) -> Self {
        Self {
            security: security.into(),
            status: value.status,
            entries: value.entries,
            redeem: value.redeem,
        }
    }

    pub(crate) fn to_value(&self) -> SecurityValue {
        SecurityValue {
            status: self.status.clone(),
            entries: self.entries.clone(),
            redeem: self.redeem.clone(),
        }
    }
}
