//! Security Registry
//!
//! Tracks each security's status, its corporate-action calendar, and the
//! designated redeemer account the book drains into on redemption. Calendar
//! entries may only be submitted by the depository operator, and a maturity
//! entry moves the security to the terminal `matured` status.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use registry::SecurityRegistry;
pub use types::{CalendarEntry, Security, SecurityValue};
