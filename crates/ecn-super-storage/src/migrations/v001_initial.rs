//! V001: Initial schema.
//! actions, observations, analyzer_runs, staged_observations.

pub const MIGRATION_SQL: &str = r#"
-- Action log: every import or analyzer run that produced observations.
-- The margin computation reads it to find dirty windows.
CREATE TABLE IF NOT EXISTS actions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analyzer_id TEXT NOT NULL,
    valid INTEGER NOT NULL DEFAULT 1,
    time_from INTEGER NOT NULL,
    time_to INTEGER NOT NULL,
    created_at INTEGER NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_actions_analyzer
    ON actions(analyzer_id, id);

-- Raw observations. path, conditions, and action_ids are JSON arrays;
-- action_ids holds {"id": .., "valid": ..} objects.
CREATE TABLE IF NOT EXISTS observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    time_from INTEGER NOT NULL,
    time_to INTEGER NOT NULL,
    path TEXT NOT NULL,
    conditions TEXT NOT NULL,
    location TEXT,
    campaign TEXT,
    action_ids TEXT NOT NULL DEFAULT '[]'
) STRICT;

CREATE INDEX IF NOT EXISTS idx_observations_time
    ON observations(time_from, time_to);
CREATE INDEX IF NOT EXISTS idx_observations_location
    ON observations(location) WHERE location IS NOT NULL;

-- One row per analyzer run: the window it claimed and how it ended.
CREATE TABLE IF NOT EXISTS analyzer_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    analyzer_id TEXT NOT NULL,
    max_action_id INTEGER NOT NULL,
    time_from INTEGER NOT NULL,
    time_to INTEGER NOT NULL,
    started_at INTEGER NOT NULL,
    completed_at INTEGER,
    group_count INTEGER,
    emitted_count INTEGER,
    skipped_count INTEGER,
    status TEXT NOT NULL DEFAULT 'running'
) STRICT;

CREATE INDEX IF NOT EXISTS idx_analyzer_runs_analyzer
    ON analyzer_runs(analyzer_id, status);

-- Super observations written by a run, pending promotion.
CREATE TABLE IF NOT EXISTS staged_observations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES analyzer_runs(id),
    time_from INTEGER NOT NULL,
    time_to INTEGER NOT NULL,
    path TEXT NOT NULL,
    conditions TEXT NOT NULL,
    sources TEXT NOT NULL,
    value TEXT NOT NULL
) STRICT;

CREATE INDEX IF NOT EXISTS idx_staged_observations_run
    ON staged_observations(run_id);
"#;
