//! Error types for the security registry

use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registry errors
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong argument count or format; no state touched
    #[error("{0}")]
    Validation(String),

    /// Referenced security absent
    #[error("{0}")]
    NotFound(String),

    /// Caller not authorized for this operation
    #[error("{0}")]
    Permission(String),

    /// Store error
    #[error("Store error: {0}")]
    Store(state_store::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<state_store::Error> for Error {
    fn from(err: state_store::Error) -> Self {
        match err {
            // Malformed key parts come straight from caller arguments
            state_store::Error::Key(msg) => Error::Validation(msg),
            other => Error::Store(other),
        }
    }
}

impl Error {
    /// Status code distinguishing the failure class to callers
    pub fn status(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Permission(_) => 403,
            Error::NotFound(_) => 404,
            Error::Store(_) | Error::Serialization(_) => 500,
        }
    }
}
