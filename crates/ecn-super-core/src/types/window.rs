//! Time ranges and the window set handed out by a window source.

use serde::{Deserialize, Serialize};

/// A closed time range in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: i64,
    pub to: i64,
}

impl TimeRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// True if `other` lies entirely inside this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        other.from >= self.from && other.to <= self.to
    }

    /// Widen this range so it also covers `other`.
    pub fn extend(&mut self, other: &TimeRange) {
        self.from = self.from.min(other.from);
        self.to = self.to.max(other.to);
    }
}

/// Candidate windows computed from the action log.
///
/// `max_action_id` is the provenance marker: the newest input action the
/// spans account for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSet {
    pub max_action_id: i64,
    pub spans: Vec<TimeRange>,
}

impl WindowSet {
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The span a run processes. Only one window is handled per run.
    pub fn first(&self) -> Option<TimeRange> {
        self.spans.first().copied()
    }
}
