//! Queries for staged_observations: the super observations a run emitted.

use ecn_super_core::errors::StorageError;
use ecn_super_core::types::{SuperObservation, TimeRange};
use rusqlite::{params, Connection};

use super::{corrupt, sqlite_err};

const TABLE: &str = "staged_observations";

/// Insert a batch of super observations for `run_id`. The caller owns the
/// transaction. Returns the number of rows inserted.
pub fn insert_batch(
    conn: &Connection,
    run_id: i64,
    batch: &[SuperObservation],
) -> Result<usize, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "INSERT INTO staged_observations
                (run_id, time_from, time_to, path, conditions, sources, value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .map_err(sqlite_err)?;

    for obs in batch {
        let path = serde_json::to_string(&obs.path).map_err(|e| corrupt(TABLE, e))?;
        let conditions = serde_json::to_string(&obs.conditions).map_err(|e| corrupt(TABLE, e))?;
        let sources = serde_json::to_string(&obs.sources).map_err(|e| corrupt(TABLE, e))?;
        let value = serde_json::to_string(&obs.value).map_err(|e| corrupt(TABLE, e))?;
        stmt.execute(params![
            run_id,
            obs.time.from,
            obs.time.to,
            path,
            conditions,
            sources,
            value
        ])
        .map_err(sqlite_err)?;
    }
    Ok(batch.len())
}

/// All super observations of a run, in insertion order.
pub fn query_by_run(conn: &Connection, run_id: i64) -> Result<Vec<SuperObservation>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT time_from, time_to, path, conditions, sources, value
             FROM staged_observations WHERE run_id = ?1 ORDER BY id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![run_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut out = Vec::new();
    for row in rows {
        let (from, to, path, conditions, sources, value) = row.map_err(sqlite_err)?;
        out.push(SuperObservation {
            time: TimeRange::new(from, to),
            path: serde_json::from_str(&path).map_err(|e| corrupt(TABLE, e))?,
            conditions: serde_json::from_str(&conditions).map_err(|e| corrupt(TABLE, e))?,
            sources: serde_json::from_str(&sources).map_err(|e| corrupt(TABLE, e))?,
            value: serde_json::from_str(&value).map_err(|e| corrupt(TABLE, e))?,
        });
    }
    Ok(out)
}

pub fn count_for_run(conn: &Connection, run_id: i64) -> Result<i64, StorageError> {
    conn.query_row(
        "SELECT COUNT(*) FROM staged_observations WHERE run_id = ?1",
        params![run_id],
        |row| row.get(0),
    )
    .map_err(sqlite_err)
}

/// Drop everything a run staged. Returns the number of rows removed.
pub fn delete_for_run(conn: &Connection, run_id: i64) -> Result<usize, StorageError> {
    conn.execute(
        "DELETE FROM staged_observations WHERE run_id = ?1",
        params![run_id],
    )
    .map_err(sqlite_err)
}
