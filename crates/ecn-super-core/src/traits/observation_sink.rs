//! ObservationSink trait.

use crate::errors::StorageError;
use crate::types::{RunSummary, SuperObservation, TimeRange};

/// Durable destination for emitted super observations.
pub trait ObservationSink {
    /// Record which window and provenance marker a run covers. Returns the
    /// run identifier that batches are attached to.
    fn begin_run(
        &mut self,
        analyzer_id: &str,
        max_action_id: i64,
        window: &TimeRange,
    ) -> Result<i64, StorageError>;

    /// Write one batch. Returns the number of records written.
    fn write_batch(
        &mut self,
        run_id: i64,
        batch: Vec<SuperObservation>,
    ) -> Result<usize, StorageError>;

    fn complete_run(&mut self, run_id: i64, summary: &RunSummary) -> Result<(), StorageError>;

    /// Close a run that a fatal error cut short. Output staged so far is
    /// discarded and the window stays outstanding.
    fn fail_run(&mut self, run_id: i64, summary: &RunSummary) -> Result<(), StorageError>;
}
