//! Dirty-span computation over the action log.
//!
//! Time is cut into aligned spans of `span_secs`. An input action makes
//! every span its time range touches dirty, unless a finished run of this
//! analyzer already covered that span after seeing the action (its
//! `max_action_id` is at least the action's id). Spans come back sorted
//! ascending, so the oldest outstanding span is processed first.

use std::collections::BTreeSet;

use ecn_super_core::errors::StorageError;
use ecn_super_core::types::{FxHashMap, TimeRange, WindowSet};
use rusqlite::Connection;

use crate::queries::actions::{self, ActionRow};
use crate::queries::runs;

/// Actions spanning more than this many spans are treated as malformed.
pub const MAX_SPANS_PER_ACTION: i64 = 10_000;

/// Aligned spans of `span_secs` touched by `range`. Spans whose bounds do
/// not fit in an `i64` are left out.
pub fn align_spans(range: &TimeRange, span_secs: i64) -> Vec<TimeRange> {
    let Some(mut start) = range.from.checked_sub(range.from.rem_euclid(span_secs)) else {
        return Vec::new();
    };
    let mut spans = Vec::new();
    while let Some(end) = start.checked_add(span_secs) {
        spans.push(TimeRange::new(start, end));
        if end >= range.to {
            break;
        }
        start = end;
    }
    spans
}

/// False for inverted ranges and ranges wider than `MAX_SPANS_PER_ACTION`.
fn is_plausible(range: &TimeRange, span_secs: i64) -> bool {
    range
        .to
        .checked_sub(range.from)
        .is_some_and(|len| len >= 0 && len / span_secs < MAX_SPANS_PER_ACTION)
}

/// Compute the window set from input actions and completed runs.
pub fn compute_margin(
    input_actions: &[ActionRow],
    completed: &[(TimeRange, i64)],
    span_secs: i64,
) -> WindowSet {
    // Newest provenance marker each span has been analyzed with.
    let mut covered: FxHashMap<TimeRange, i64> = FxHashMap::default();
    for (window, max_action_id) in completed {
        for span in align_spans(window, span_secs) {
            if !window.contains(&span) {
                continue;
            }
            let seen = covered.entry(span).or_insert(*max_action_id);
            *seen = (*seen).max(*max_action_id);
        }
    }

    let mut dirty = BTreeSet::new();
    let mut max_action_id = 0;
    for action in input_actions {
        max_action_id = max_action_id.max(action.id);
        if !is_plausible(&action.time, span_secs) {
            tracing::warn!(
                action_id = action.id,
                from = action.time.from,
                to = action.time.to,
                "ignoring action with malformed time range"
            );
            continue;
        }
        for span in align_spans(&action.time, span_secs) {
            let up_to_date = covered.get(&span).is_some_and(|seen| *seen >= action.id);
            if !up_to_date {
                dirty.insert(span);
            }
        }
    }

    WindowSet {
        max_action_id,
        spans: dirty.into_iter().collect(),
    }
}

/// Load the action log and run history for `analyzer_id` and compute its
/// window set.
pub fn load_margin(
    conn: &Connection,
    analyzer_id: &str,
    span_secs: i64,
) -> Result<WindowSet, StorageError> {
    let inputs = actions::input_actions(conn, analyzer_id)?;
    let completed = runs::completed_windows(conn, analyzer_id)?;
    let windows = compute_margin(&inputs, &completed, span_secs);
    tracing::debug!(
        analyzer_id,
        input_actions = inputs.len(),
        completed_runs = completed.len(),
        dirty_spans = windows.spans.len(),
        max_action_id = windows.max_action_id,
        "margin computed"
    );
    Ok(windows)
}
