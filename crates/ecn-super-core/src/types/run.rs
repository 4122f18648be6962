//! Run bookkeeping.

use std::fmt;

use serde::Serialize;

use super::window::TimeRange;

/// Final state of a run, persisted with its bookkeeping row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    /// Completed, but at least one group was skipped.
    CompletedWithDefects,
    /// Aborted by a fatal error; its staged output was discarded.
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::CompletedWithDefects => "completed_with_defects",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "completed_with_defects" => Some(Self::CompletedWithDefects),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether a run in this state accounts for its window.
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Completed | Self::CompletedWithDefects)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters for one processed window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: i64,
    pub window: Option<TimeRange>,
    pub max_action_id: i64,
    pub windows_available: usize,
    pub observations_scanned: u64,
    pub observations_rejected: u64,
    pub groups: usize,
    pub emitted: usize,
    pub skipped: usize,
    pub batches: usize,
}

impl RunSummary {
    pub fn status(&self) -> RunStatus {
        if self.skipped > 0 {
            RunStatus::CompletedWithDefects
        } else {
            RunStatus::Completed
        }
    }
}
