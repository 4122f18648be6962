//! Queries for the analyzer_runs table: which windows each run claimed.

use ecn_super_core::errors::StorageError;
use ecn_super_core::types::{RunStatus, RunSummary, TimeRange};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use super::sqlite_err;

/// An analyzer run record.
#[derive(Debug, Clone)]
pub struct AnalyzerRunRow {
    pub id: i64,
    pub analyzer_id: String,
    pub max_action_id: i64,
    pub window: TimeRange,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub group_count: Option<i64>,
    pub emitted_count: Option<i64>,
    pub skipped_count: Option<i64>,
    pub status: RunStatus,
}

/// Insert a run record (status = 'running'). Returns the row id.
pub fn insert_run_start(
    conn: &Connection,
    analyzer_id: &str,
    max_action_id: i64,
    window: &TimeRange,
    started_at: i64,
) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO analyzer_runs
            (analyzer_id, max_action_id, time_from, time_to, started_at, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            analyzer_id,
            max_action_id,
            window.from,
            window.to,
            started_at,
            RunStatus::Running.as_str()
        ],
    )
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Close a run with its counters.
pub fn update_run_complete(
    conn: &Connection,
    id: i64,
    completed_at: i64,
    summary: &RunSummary,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE analyzer_runs SET
            completed_at = ?1, group_count = ?2, emitted_count = ?3,
            skipped_count = ?4, status = ?5
         WHERE id = ?6",
        params![
            completed_at,
            summary.groups as i64,
            summary.emitted as i64,
            summary.skipped as i64,
            summary.status().as_str(),
            id
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

/// Windows already accounted for by finished runs of `analyzer_id`, with
/// the provenance marker each run saw. Running and failed runs are left out.
pub fn completed_windows(
    conn: &Connection,
    analyzer_id: &str,
) -> Result<Vec<(TimeRange, i64)>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT time_from, time_to, max_action_id, status FROM analyzer_runs
             WHERE analyzer_id = ?1
             ORDER BY id",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![analyzer_id], |row| {
            Ok((
                TimeRange::new(row.get(0)?, row.get(1)?),
                row.get::<_, i64>(2)?,
                status_column(row, 3)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut windows = Vec::new();
    for row in rows {
        let (window, max_action_id, status) = row.map_err(sqlite_err)?;
        if status.is_complete() {
            windows.push((window, max_action_id));
        }
    }
    Ok(windows)
}

/// Mark a run failed. Its emitted count is zeroed since staged rows are
/// discarded alongside.
pub fn mark_run_failed(
    conn: &Connection,
    id: i64,
    completed_at: i64,
    summary: &RunSummary,
) -> Result<(), StorageError> {
    conn.execute(
        "UPDATE analyzer_runs SET
            completed_at = ?1, group_count = ?2, emitted_count = 0,
            skipped_count = ?3, status = ?4
         WHERE id = ?5",
        params![
            completed_at,
            summary.groups as i64,
            summary.skipped as i64,
            RunStatus::Failed.as_str(),
            id
        ],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

fn status_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<RunStatus> {
    let raw: String = row.get(idx)?;
    RunStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown run status '{raw}'").into(),
        )
    })
}

/// Query recent runs of an analyzer, newest first.
pub fn query_recent(
    conn: &Connection,
    analyzer_id: &str,
    limit: usize,
) -> Result<Vec<AnalyzerRunRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, analyzer_id, max_action_id, time_from, time_to, started_at,
                    completed_at, group_count, emitted_count, skipped_count, status
             FROM analyzer_runs WHERE analyzer_id = ?1
             ORDER BY id DESC LIMIT ?2",
        )
        .map_err(sqlite_err)?;

    let rows = stmt
        .query_map(params![analyzer_id, limit as i64], |row| {
            Ok(AnalyzerRunRow {
                id: row.get(0)?,
                analyzer_id: row.get(1)?,
                max_action_id: row.get(2)?,
                window: TimeRange::new(row.get(3)?, row.get(4)?),
                started_at: row.get(5)?,
                completed_at: row.get(6)?,
                group_count: row.get(7)?,
                emitted_count: row.get(8)?,
                skipped_count: row.get(9)?,
                status: status_column(row, 10)?,
            })
        })
        .map_err(sqlite_err)?;

    rows.collect::<Result<Vec<_>, _>>().map_err(sqlite_err)
}
