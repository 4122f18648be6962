//! SQLite implementations of the driver's collaborator traits.
//!
//! All three share one `DatabaseManager`; reads go through the read pool,
//! writes through the serialized writer.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use ecn_super_core::constants::SECONDS_PER_HOUR;
use ecn_super_core::errors::StorageError;
use ecn_super_core::filter::ObservationFilter;
use ecn_super_core::traits::{ObservationSink, ObservationSource, WindowSource};
use ecn_super_core::types::{
    GroupedRecord, RawObservation, RunSummary, SuperObservation, TimeRange, WindowSet,
};

use crate::connection::writer::with_immediate_transaction;
use crate::connection::DatabaseManager;
use crate::queries::{actions, grouped, observations, runs, staged};
use crate::window::load_margin;

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Margin-based window source for one analyzer.
pub struct SqliteWindowSource {
    db: Arc<DatabaseManager>,
    analyzer_id: String,
    span_secs: i64,
}

impl SqliteWindowSource {
    pub fn new(db: Arc<DatabaseManager>, analyzer_id: impl Into<String>, timespan_hours: u32) -> Self {
        Self {
            db,
            analyzer_id: analyzer_id.into(),
            span_secs: i64::from(timespan_hours) * SECONDS_PER_HOUR,
        }
    }
}

impl WindowSource for SqliteWindowSource {
    fn windows(&self) -> Result<WindowSet, StorageError> {
        self.db
            .with_reader(|conn| load_margin(conn, &self.analyzer_id, self.span_secs))
    }
}

/// Raw observation reader.
pub struct SqliteObservationSource {
    db: Arc<DatabaseManager>,
}

impl SqliteObservationSource {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

impl ObservationSource for SqliteObservationSource {
    fn scan_window(
        &self,
        window: &TimeRange,
        visit: &mut dyn FnMut(RawObservation),
    ) -> Result<u64, StorageError> {
        self.db
            .with_reader(|conn| observations::scan_window(conn, window, visit))
    }

    fn grouped(&self, filter: &ObservationFilter) -> Result<Vec<GroupedRecord>, StorageError> {
        self.db
            .with_reader(|conn| grouped::grouped_in_window(conn, filter))
    }
}

/// Staged-output writer. Each batch is one immediate transaction.
pub struct SqliteObservationSink {
    db: Arc<DatabaseManager>,
    analyzer_id: Option<String>,
    window: Option<TimeRange>,
}

impl SqliteObservationSink {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self {
            db,
            analyzer_id: None,
            window: None,
        }
    }
}

impl ObservationSink for SqliteObservationSink {
    fn begin_run(
        &mut self,
        analyzer_id: &str,
        max_action_id: i64,
        window: &TimeRange,
    ) -> Result<i64, StorageError> {
        let run_id = self.db.with_writer(|conn| {
            runs::insert_run_start(conn, analyzer_id, max_action_id, window, now_secs())
        })?;
        self.analyzer_id = Some(analyzer_id.to_string());
        self.window = Some(*window);
        Ok(run_id)
    }

    fn write_batch(
        &mut self,
        run_id: i64,
        batch: Vec<SuperObservation>,
    ) -> Result<usize, StorageError> {
        let started = Instant::now();
        let written = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| staged::insert_batch(tx, run_id, &batch))
        })?;
        tracing::debug!(
            run_id,
            rows = written,
            batch_write_time = started.elapsed().as_millis() as u64,
            "staged batch written"
        );
        Ok(written)
    }

    fn complete_run(&mut self, run_id: i64, summary: &RunSummary) -> Result<(), StorageError> {
        let completed_at = now_secs();
        self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                runs::update_run_complete(tx, run_id, completed_at, summary)?;
                // The run's output is itself an action other analyzers react to.
                if let (Some(analyzer_id), Some(window)) = (&self.analyzer_id, &self.window) {
                    actions::insert_action(tx, analyzer_id, true, window, completed_at)?;
                }
                Ok(())
            })
        })?;
        self.db.checkpoint()
    }

    fn fail_run(&mut self, run_id: i64, summary: &RunSummary) -> Result<(), StorageError> {
        let completed_at = now_secs();
        let discarded = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let discarded = staged::delete_for_run(tx, run_id)?;
                runs::mark_run_failed(tx, run_id, completed_at, summary)?;
                Ok(discarded)
            })
        })?;
        tracing::debug!(run_id, discarded, "failed run closed");
        Ok(())
    }
}
