//! Queries for the raw observations table.

use ecn_super_core::errors::StorageError;
use ecn_super_core::types::{
    ActionRef, ObservationId, ObservationValue, RawObservation, TimeRange,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{corrupt, sqlite_err};

const TABLE: &str = "observations";

const SELECT_COLUMNS: &str =
    "id, time_from, time_to, path, conditions, location, campaign, action_ids";

/// Undecoded observation row; JSON columns are still text.
struct ObservationRow {
    id: i64,
    time_from: i64,
    time_to: i64,
    path: String,
    conditions: String,
    location: Option<String>,
    campaign: Option<String>,
    action_ids: String,
}

impl ObservationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            time_from: row.get(1)?,
            time_to: row.get(2)?,
            path: row.get(3)?,
            conditions: row.get(4)?,
            location: row.get(5)?,
            campaign: row.get(6)?,
            action_ids: row.get(7)?,
        })
    }

    fn decode(self) -> Result<RawObservation, StorageError> {
        let action_ids: Vec<ActionRef> =
            serde_json::from_str(&self.action_ids).map_err(|e| corrupt(TABLE, e))?;
        Ok(RawObservation {
            id: self.id,
            time: TimeRange::new(self.time_from, self.time_to),
            path: serde_json::from_str(&self.path).map_err(|e| corrupt(TABLE, e))?,
            conditions: serde_json::from_str(&self.conditions).map_err(|e| corrupt(TABLE, e))?,
            value: ObservationValue {
                location: self.location,
                campaign: self.campaign,
            },
            action_ids,
        })
    }
}

/// Insert a raw observation. Its `id` is ignored; the new row id is returned.
pub fn insert_observation(
    conn: &Connection,
    obs: &RawObservation,
) -> Result<ObservationId, StorageError> {
    let path = serde_json::to_string(&obs.path).map_err(|e| corrupt(TABLE, e))?;
    let conditions = serde_json::to_string(&obs.conditions).map_err(|e| corrupt(TABLE, e))?;
    let action_ids = serde_json::to_string(&obs.action_ids).map_err(|e| corrupt(TABLE, e))?;

    conn.prepare_cached(
        "INSERT INTO observations
            (time_from, time_to, path, conditions, location, campaign, action_ids)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            obs.time.from,
            obs.time.to,
            path,
            conditions,
            obs.value.location,
            obs.value.campaign,
            action_ids,
        ])
    })
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// Record an action on an observation. The newest action goes first, which
/// is where the default validity check looks.
pub fn prepend_action(
    conn: &Connection,
    id: ObservationId,
    action: ActionRef,
) -> Result<(), StorageError> {
    let current: String = conn
        .query_row(
            "SELECT action_ids FROM observations WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .map_err(sqlite_err)?;
    let mut actions: Vec<ActionRef> =
        serde_json::from_str(&current).map_err(|e| corrupt(TABLE, e))?;
    actions.insert(0, action);
    let updated = serde_json::to_string(&actions).map_err(|e| corrupt(TABLE, e))?;
    conn.execute(
        "UPDATE observations SET action_ids = ?1 WHERE id = ?2",
        params![updated, id],
    )
    .map_err(sqlite_err)?;
    Ok(())
}

pub fn get_observation(
    conn: &Connection,
    id: ObservationId,
) -> Result<Option<RawObservation>, StorageError> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM observations WHERE id = ?1");
    conn.query_row(&sql, params![id], ObservationRow::from_row)
        .optional()
        .map_err(sqlite_err)?
        .map(ObservationRow::decode)
        .transpose()
}

/// Visit every observation whose bounds lie inside `window` and that has a
/// location, in id order. Returns the number visited.
pub fn scan_window(
    conn: &Connection,
    window: &TimeRange,
    visit: &mut dyn FnMut(RawObservation),
) -> Result<u64, StorageError> {
    let sql = format!(
        "SELECT {SELECT_COLUMNS} FROM observations
         WHERE time_from >= ?1 AND time_to <= ?2 AND location IS NOT NULL
         ORDER BY id"
    );
    let mut stmt = conn.prepare_cached(&sql).map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![window.from, window.to], ObservationRow::from_row)
        .map_err(sqlite_err)?;

    let mut visited = 0u64;
    for row in rows {
        let obs = row.map_err(sqlite_err)?.decode()?;
        visit(obs);
        visited += 1;
    }
    Ok(visited)
}

pub fn count(conn: &Connection) -> Result<i64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))
        .map_err(sqlite_err)
}
