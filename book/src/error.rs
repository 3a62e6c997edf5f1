//! Error types for the book

use thiserror::Error;

/// Result type for book operations
pub type Result<T> = std::result::Result<T, Error>;

/// Book errors
///
/// Each class is a distinct status so callers can branch on semantics:
/// Validation never touches state, NotFound names a missing position,
/// Conflict covers insufficient balance and exactly-once violations.
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong argument count or format; no state touched
    #[error("{0}")]
    Validation(String),

    /// Referenced position absent
    #[error("{0}")]
    NotFound(String),

    /// Insufficient balance, instruction already executed, or security
    /// already redeemed
    #[error("{0}")]
    Conflict(String),

    /// Security Registry lookup failed
    #[error("Cannot load information about security. {0}")]
    Lookup(#[from] common::LookupError),

    /// Store error
    #[error("Store error: {0}")]
    Store(state_store::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<common::InstructionError> for Error {
    fn from(err: common::InstructionError) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<state_store::Error> for Error {
    fn from(err: state_store::Error) -> Self {
        match err {
            // Malformed key parts come straight from caller arguments
            state_store::Error::Key(msg) => Error::Validation(msg),
            conflict @ state_store::Error::WriteConflict(_) => {
                Error::Conflict(conflict.to_string())
            }
            other => Error::Store(other),
        }
    }
}

impl Error {
    /// Status code distinguishing the failure class to callers
    pub fn status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::NotFound(_) => 404,
            Error::Conflict(_) => 409,
            Error::Lookup(_) | Error::Store(_) | Error::Serialization(_) => 500,
        }
    }
}
