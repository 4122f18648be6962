//! Queries for the actions table: the log the margin computation reads.

use ecn_super_core::errors::StorageError;
use ecn_super_core::types::TimeRange;
use rusqlite::{params, Connection};

use super::sqlite_err;

/// An action as seen by the margin computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRow {
    pub id: i64,
    pub time: TimeRange,
}

/// Record an action. Returns its id.
pub fn insert_action(
    conn: &Connection,
    analyzer_id: &str,
    valid: bool,
    time: &TimeRange,
    created_at: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO actions (analyzer_id, valid, time_from, time_to, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![analyzer_id, valid, time.from, time.to, created_at],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Mark an action invalid (e.g. its import was rolled back).
pub fn invalidate_action(conn: &Connection, id: i64) -> Result<bool, StorageError> {
    let changed = conn
        .execute("UPDATE actions SET valid = 0 WHERE id = ?1", params![id])
        .map_err(sqlite_err)?;
    Ok(changed > 0)
}

/// Valid actions from other analyzers, oldest first. These are the inputs
/// an analyzer reacts to.
pub fn input_actions(conn: &Connection, analyzer_id: &str) -> Result<Vec<ActionRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, time_from, time_to FROM actions
             WHERE analyzer_id != ?1 AND valid = 1
             ORDER BY id",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![analyzer_id], |row| {
            Ok(ActionRow {
                id: row.get(0)?,
                time: TimeRange::new(row.get(1)?, row.get(2)?),
            })
        })
        .map_err(sqlite_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM actions", [], |row| row.get(0))
        .map_err(sqlite_err)
}
