//! The driver's collaborators, bundled.

use std::sync::Arc;

use ecn_super_core::config::AnalyzerConfig;
use ecn_super_core::traits::{ObservationSink, ObservationSource, WindowSource};
use ecn_super_storage::{
    DatabaseManager, SqliteObservationSink, SqliteObservationSource, SqliteWindowSource,
};

/// Window source, observation source and output sink for one run.
pub struct AnalyzerContext {
    pub windows: Box<dyn WindowSource>,
    pub input: Box<dyn ObservationSource>,
    pub output: Box<dyn ObservationSink>,
}

impl AnalyzerContext {
    pub fn new(
        windows: Box<dyn WindowSource>,
        input: Box<dyn ObservationSource>,
        output: Box<dyn ObservationSink>,
    ) -> Self {
        Self {
            windows,
            input,
            output,
        }
    }

    /// All three collaborators backed by one SQLite database.
    pub fn sqlite(db: Arc<DatabaseManager>, config: &AnalyzerConfig) -> Self {
        Self::new(
            Box::new(SqliteWindowSource::new(
                Arc::clone(&db),
                config.effective_analyzer_id(),
                config.effective_timespan_hours(),
            )),
            Box::new(SqliteObservationSource::new(Arc::clone(&db))),
            Box::new(SqliteObservationSink::new(db)),
        )
    }
}
