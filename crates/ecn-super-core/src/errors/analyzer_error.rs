//! Analyzer run errors and non-fatal defect collection.

use super::error_code::{self, EcnErrorCode};
use super::{ConfigError, ResolveError, StorageError};

/// Errors that can occur while running one analysis window.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No window available for analyzer {analyzer_id}")]
    NoWindowAvailable { analyzer_id: String },

    #[error("Group ({destination}, {location}) skipped: {source}")]
    GroupSkipped {
        destination: String,
        location: String,
        #[source]
        source: ResolveError,
    },
}

impl AnalyzerError {
    /// True for errors that abort the run rather than skip one group.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::GroupSkipped { .. })
    }
}

impl EcnErrorCode for AnalyzerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::NoWindowAvailable { .. } => error_code::NO_WINDOW,
            Self::GroupSkipped { source, .. } => source.error_code(),
        }
    }
}

/// Result of a run that accumulates non-fatal errors.
/// Lets the run complete even when individual groups are defective.
#[derive(Debug, Default)]
pub struct RunResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<AnalyzerError>,
}

impl<T: Default> RunResult<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: AnalyzerError) {
        self.errors.push(error);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
