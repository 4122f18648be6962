//! Write transactions: BEGIN IMMEDIATE with auto-rollback.

use ecn_super_core::errors::StorageError;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};

/// Execute a write operation inside a BEGIN IMMEDIATE transaction.
/// The write lock is taken at transaction start, so a busy database fails
/// fast instead of mid-batch. Dropping the transaction on an early return
/// rolls it back.
pub fn with_immediate_transaction<F, T>(conn: &Connection, f: F) -> Result<T, StorageError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, StorageError>,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate).map_err(|e| {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                StorageError::DbBusy
            }
            _ => StorageError::SqliteError {
                message: format!("failed to begin immediate transaction: {e}"),
            },
        }
    })?;

    let result = f(&tx)?;

    tx.commit().map_err(|e| StorageError::SqliteError {
        message: format!("failed to commit: {e}"),
    })?;

    Ok(result)
}
