//! Commit-or-rollback settlement for a unit of work.

use tracing::{debug, error, warn};

use crate::error::{GrocerError, Result};

/// The two ways a transaction can end.
pub(super) trait Finish {
    fn commit(self) -> rusqlite::Result<()>;
    fn rollback(self) -> rusqlite::Result<()>;
}

impl Finish for rusqlite::Transaction<'_> {
    fn commit(self) -> rusqlite::Result<()> {
        rusqlite::Transaction::commit(self)
    }

    fn rollback(self) -> rusqlite::Result<()> {
        rusqlite::Transaction::rollback(self)
    }
}

/// Commit if the work succeeded, otherwise roll back.
///
/// A failed rollback never hides the original error: both are returned in
/// `GrocerError::Rollback`.
pub(super) fn settle<T, F: Finish>(operation: &str, tx: F, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            tx.commit().map_err(|e| {
                error!(operation, error = %e, "commit failed");
                GrocerError::Transaction(format!("Commit failed: {}", e))
            })?;
            debug!(operation, "unit of work committed");
            Ok(value)
        }
        Err(err) => match tx.rollback() {
            Ok(()) => {
                warn!(operation, error = %err, "unit of work rolled back");
                Err(err)
            }
            Err(rollback) => {
                error!(operation, error = %err, rollback = %rollback, "rollback failed");
                Err(GrocerError::Rollback {
                    error: Box::new(err),
                    rollback: rollback.to_string(),
                })
            }
        },
    }
}
