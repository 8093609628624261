//! Error types for Grocer core operations.
//!
//! Errors are descriptive at the core level; the request layer (or the CLI)
//! maps them to user-facing responses through [`GrocerError::kind`].

use rusqlite::ffi;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type alias for Grocer operations.
pub type Result<T> = std::result::Result<T, GrocerError>;

/// Core error type for Grocer operations.
#[derive(Debug, Error)]
pub enum GrocerError {
    /// Recipe, schedule, ingredient or junction row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation that was not resolved locally
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Parameter validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Begin or commit failure
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// The unit of work failed and so did its rollback
    #[error("Transaction error: {error}, rollback error: {rollback}")]
    Rollback {
        error: Box<GrocerError>,
        rollback: String,
    },

    /// Database cannot be opened or read
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Gave up waiting for a database lock
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A running statement was interrupted
    #[error("Operation cancelled")]
    Cancelled,

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Coarse classification used to pick a user-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 404-equivalent
    NotFound,
    /// 400-equivalent
    Invalid,
    /// 500-equivalent
    Internal,
}

impl GrocerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrocerError::NotFound(_) => ErrorKind::NotFound,
            GrocerError::Conflict(_) | GrocerError::Validation(_) => ErrorKind::Invalid,
            GrocerError::Transaction(_)
            | GrocerError::Rollback { .. }
            | GrocerError::Connectivity(_)
            | GrocerError::Timeout(_)
            | GrocerError::Cancelled
            | GrocerError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<rusqlite::Error> for GrocerError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                GrocerError::NotFound("No matching row".to_string())
            }
            rusqlite::Error::SqliteFailure(ref failure, _) => match failure.code {
                ErrorCode::ConstraintViolation => match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        GrocerError::NotFound(format!("Referenced row does not exist ({})", err))
                    }
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        GrocerError::Conflict(err.to_string())
                    }
                    _ => GrocerError::Validation(err.to_string()),
                },
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                    GrocerError::Timeout(err.to_string())
                }
                ErrorCode::OperationInterrupted => GrocerError::Cancelled,
                ErrorCode::CannotOpen | ErrorCode::SystemIoFailure | ErrorCode::NotADatabase => {
                    GrocerError::Connectivity(err.to_string())
                }
                _ => GrocerError::Storage(format!("SQLite error: {}", err)),
            },
            other => GrocerError::Storage(format!("SQLite error: {}", other)),
        }
    }
}

impl From<std::io::Error> for GrocerError {
    fn from(err: std::io::Error) -> Self {
        GrocerError::Connectivity(err.to_string())
    }
}
