//! Run bookkeeping, staged output, margin loading, and the store adapters.

use std::sync::Arc;

use ecn_super_core::traits::{ObservationSink, WindowSource};
use ecn_super_core::types::{
    ObservationSources, RunStatus, RunSummary, SuperObservation, SuperValue, TimeRange,
};
use ecn_super_storage::connection::pragmas::verify_wal_mode;
use ecn_super_storage::migrations::{current_version, run_migrations};
use ecn_super_storage::queries::{actions, runs, staged};
use ecn_super_storage::window::load_margin;
use ecn_super_storage::{DatabaseManager, SqliteObservationSink, SqliteWindowSource};
use rusqlite::Connection;

const HOUR: i64 = 3_600;

fn setup_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
}

fn super_obs(dest: &str) -> SuperObservation {
    SuperObservation {
        time: TimeRange::new(10, 20),
        path: vec!["*".into(), dest.into()],
        conditions: vec!["ecn.connectivity.super.works".into()],
        sources: ObservationSources { obs: vec![1, 2, 2] },
        value: SuperValue {
            location: "ams".into(),
        },
    }
}

#[test]
fn migrations_are_idempotent() {
    let conn = setup_db();
    let version = current_version(&conn).unwrap();
    assert!(version >= 1);
    run_migrations(&conn).unwrap();
    assert_eq!(current_version(&conn).unwrap(), version);
}

#[test]
fn staged_batch_roundtrip() {
    let conn = setup_db();
    let run_id = runs::insert_run_start(&conn, "ecn-super", 3, &TimeRange::new(0, HOUR), 1).unwrap();

    let written = staged::insert_batch(&conn, run_id, &[super_obs("d1"), super_obs("d2")]).unwrap();
    assert_eq!(written, 2);
    assert_eq!(staged::count_for_run(&conn, run_id).unwrap(), 2);

    let loaded = staged::query_by_run(&conn, run_id).unwrap();
    assert_eq!(loaded, vec![super_obs("d1"), super_obs("d2")]);
}

#[test]
fn running_runs_do_not_count_as_completed() {
    let conn = setup_db();
    let window = TimeRange::new(0, 2 * HOUR);
    let run_id = runs::insert_run_start(&conn, "ecn-super", 4, &window, 1).unwrap();
    assert!(runs::completed_windows(&conn, "ecn-super").unwrap().is_empty());

    let summary = RunSummary {
        run_id,
        groups: 3,
        emitted: 2,
        skipped: 1,
        ..RunSummary::default()
    };
    runs::update_run_complete(&conn, run_id, 2, &summary).unwrap();

    assert_eq!(
        runs::completed_windows(&conn, "ecn-super").unwrap(),
        vec![(window, 4)]
    );
    let recent = runs::query_recent(&conn, "ecn-super", 10).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].status, RunStatus::CompletedWithDefects);
}

#[test]
fn margin_ignores_own_actions_and_invalid_ones() {
    let conn = setup_db();
    actions::insert_action(&conn, "ingest", true, &TimeRange::new(10, 20), 1).unwrap();
    let bad = actions::insert_action(&conn, "ingest", true, &TimeRange::new(3 * HOUR, 3 * HOUR + 5), 1)
        .unwrap();
    actions::invalidate_action(&conn, bad).unwrap();
    actions::insert_action(&conn, "ecn-super", true, &TimeRange::new(5 * HOUR, 5 * HOUR + 5), 1)
        .unwrap();

    let set = load_margin(&conn, "ecn-super", 2 * HOUR).unwrap();
    assert_eq!(set.spans, vec![TimeRange::new(0, 2 * HOUR)]);
    assert_eq!(set.max_action_id, 1);
}

#[test]
fn completed_run_clears_its_window() {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    db.with_writer(|conn| {
        actions::insert_action(conn, "ingest", true, &TimeRange::new(10, 20), 1)?;
        actions::insert_action(conn, "ingest", true, &TimeRange::new(2 * HOUR + 1, 2 * HOUR + 9), 1)
    })
    .unwrap();

    let source = SqliteWindowSource::new(Arc::clone(&db), "ecn-super", 2);
    let before = source.windows().unwrap();
    assert_eq!(
        before.spans,
        vec![TimeRange::new(0, 2 * HOUR), TimeRange::new(2 * HOUR, 4 * HOUR)]
    );

    let mut sink = SqliteObservationSink::new(Arc::clone(&db));
    let window = before.spans[0];
    let run_id = sink.begin_run("ecn-super", before.max_action_id, &window).unwrap();
    sink.write_batch(run_id, vec![super_obs("d1")]).unwrap();
    let summary = RunSummary {
        run_id,
        window: Some(window),
        groups: 1,
        emitted: 1,
        ..RunSummary::default()
    };
    sink.complete_run(run_id, &summary).unwrap();

    let after = source.windows().unwrap();
    assert_eq!(after.spans, vec![TimeRange::new(2 * HOUR, 4 * HOUR)]);

    // The run itself was recorded as an action of this analyzer.
    let total = db.with_reader(actions::count).unwrap();
    assert_eq!(total, 3);
}

#[test]
fn newer_action_redirties_a_completed_window() {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    db.with_writer(|conn| actions::insert_action(conn, "ingest", true, &TimeRange::new(10, 20), 1))
        .unwrap();

    let source = SqliteWindowSource::new(Arc::clone(&db), "ecn-super", 2);
    let mut sink = SqliteObservationSink::new(Arc::clone(&db));
    let set = source.windows().unwrap();
    let run_id = sink.begin_run("ecn-super", set.max_action_id, &set.spans[0]).unwrap();
    sink.complete_run(run_id, &RunSummary::default()).unwrap();
    assert!(source.windows().unwrap().is_empty());

    db.with_writer(|conn| actions::insert_action(conn, "ingest", true, &TimeRange::new(30, 40), 2))
        .unwrap();
    let again = source.windows().unwrap();
    assert_eq!(again.spans, vec![TimeRange::new(0, 2 * HOUR)]);
    assert_eq!(again.max_action_id, 3);
}

#[test]
fn file_backed_database_reads_through_pool() {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseManager::open(&dir.path().join("ecn-super.db"), 2).unwrap();
    db.with_writer(|conn| actions::insert_action(conn, "ingest", true, &TimeRange::new(10, 20), 1))
        .unwrap();
    assert_eq!(db.with_reader(actions::count).unwrap(), 1);
    db.checkpoint().unwrap();
    assert!(db.path().is_some());
    assert!(db.with_writer(verify_wal_mode).unwrap());
}

#[test]
fn in_memory_database_is_not_wal() {
    let db = DatabaseManager::open_in_memory().unwrap();
    assert!(!db.with_writer(verify_wal_mode).unwrap());
}

#[test]
fn failed_run_discards_staged_output_and_keeps_window_dirty() {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    db.with_writer(|conn| actions::insert_action(conn, "ingest", true, &TimeRange::new(10, 20), 1))
        .unwrap();

    let source = SqliteWindowSource::new(Arc::clone(&db), "ecn-super", 2);
    let before = source.windows().unwrap();
    let window = before.spans[0];

    let mut sink = SqliteObservationSink::new(Arc::clone(&db));
    let run_id = sink.begin_run("ecn-super", before.max_action_id, &window).unwrap();
    sink.write_batch(run_id, vec![super_obs("d1")]).unwrap();
    assert_eq!(db.with_reader(|c| staged::count_for_run(c, run_id)).unwrap(), 1);

    let summary = RunSummary {
        run_id,
        window: Some(window),
        groups: 3,
        emitted: 1,
        ..RunSummary::default()
    };
    sink.fail_run(run_id, &summary).unwrap();

    assert_eq!(db.with_reader(|c| staged::count_for_run(c, run_id)).unwrap(), 0);
    let recent = db.with_reader(|c| runs::query_recent(c, "ecn-super", 1)).unwrap();
    assert_eq!(recent[0].status, RunStatus::Failed);
    assert_eq!(recent[0].emitted_count, Some(0));
    assert!(recent[0].completed_at.is_some());

    // No own action was recorded and the window is still outstanding.
    assert_eq!(db.with_reader(actions::count).unwrap(), 1);
    assert_eq!(source.windows().unwrap().spans, before.spans);
}
