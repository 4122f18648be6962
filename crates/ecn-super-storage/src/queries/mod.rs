//! Typed query functions, one module per table.

pub mod actions;
pub mod grouped;
pub mod observations;
pub mod runs;
pub mod staged;

use ecn_super_core::errors::StorageError;

pub(crate) fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

pub(crate) fn corrupt(table: &'static str, e: serde_json::Error) -> StorageError {
    StorageError::CorruptRow {
        table,
        message: e.to_string(),
    }
}
