//! Store-side grouping: filter, unwind conditions with `json_each`, and
//! group by (destination, location) in one query.
//!
//! Produces the same groups as folding the eligible observations in
//! process. Arrays built by `json_group_array` have no guaranteed order;
//! only their contents are meaningful.

use ecn_super_core::errors::StorageError;
use ecn_super_core::filter::ObservationFilter;
use ecn_super_core::types::{Condition, GroupKey, GroupedRecord, ValidityPosition};
use rusqlite::{params, Connection};

use super::{corrupt, sqlite_err};

const TABLE: &str = "observations";

const GROUPED_SQL: &str = "
    SELECT json_extract(o.path, '$[#-1]') AS dip,
           o.location,
           json_group_array(json_extract(o.path, '$[0]')) AS sips,
           json_group_array(c.value) AS conditions,
           json_group_array(o.id) AS obs,
           MIN(o.time_from) AS time_from,
           MAX(o.time_to) AS time_to
    FROM observations o, json_each(o.conditions) c
    WHERE o.time_from >= ?1
      AND o.time_to <= ?2
      AND o.location IS NOT NULL
      AND json_array_length(o.path) > 0
      AND json_extract(o.action_ids, ?3) = 1
      AND c.value IN (SELECT value FROM json_each(?4))
      AND (?5 IS NULL
           OR o.campaign IS NULL
           OR o.campaign NOT IN (SELECT value FROM json_each(?5)))
    GROUP BY dip, o.location
    ORDER BY dip, o.location";

fn validity_path(position: ValidityPosition) -> &'static str {
    match position {
        ValidityPosition::First => "$[0].valid",
        ValidityPosition::Last => "$[#-1].valid",
    }
}

struct GroupedRow {
    dip: String,
    location: String,
    sips: String,
    conditions: String,
    obs: String,
    time_from: i64,
    time_to: i64,
}

impl GroupedRow {
    fn decode(self) -> Result<GroupedRecord, StorageError> {
        Ok(GroupedRecord {
            key: GroupKey::new(self.dip, self.location),
            sips: serde_json::from_str(&self.sips).map_err(|e| corrupt(TABLE, e))?,
            conditions: serde_json::from_str(&self.conditions).map_err(|e| corrupt(TABLE, e))?,
            obs: serde_json::from_str(&self.obs).map_err(|e| corrupt(TABLE, e))?,
            time_from: self.time_from,
            time_to: self.time_to,
        })
    }
}

/// Group eligible observations inside SQLite.
pub fn grouped_in_window(
    conn: &Connection,
    filter: &ObservationFilter,
) -> Result<Vec<GroupedRecord>, StorageError> {
    let vocabulary =
        serde_json::to_string(&Condition::labels()).map_err(|e| corrupt(TABLE, e))?;
    let excluded = filter
        .excluded_campaigns
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| corrupt(TABLE, e))?;

    let mut stmt = conn.prepare_cached(GROUPED_SQL).map_err(sqlite_err)?;
    let rows = stmt
        .query_map(
            params![
                filter.window.from,
                filter.window.to,
                validity_path(filter.validity_position),
                vocabulary,
                excluded,
            ],
            |row| {
                Ok(GroupedRow {
                    dip: row.get(0)?,
                    location: row.get(1)?,
                    sips: row.get(2)?,
                    conditions: row.get(3)?,
                    obs: row.get(4)?,
                    time_from: row.get(5)?,
                    time_to: row.get(6)?,
                })
            },
        )
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(sqlite_err)?.decode()?);
    }
    tracing::debug!(groups = records.len(), "store-side grouping finished");
    Ok(records)
}
