//! ObservationSource trait.

use crate::errors::StorageError;
use crate::filter::ObservationFilter;
use crate::types::{GroupedRecord, RawObservation, TimeRange};

/// Read access to raw observations.
pub trait ObservationSource {
    /// Visit every observation whose time bounds lie within `window` and
    /// that carries a location. Further eligibility checks are the
    /// caller's. Returns the number of observations visited.
    fn scan_window(
        &self,
        window: &TimeRange,
        visit: &mut dyn FnMut(RawObservation),
    ) -> Result<u64, StorageError>;

    /// Filter, unwind, and group inside the store. Records are returned in
    /// ascending key order.
    fn grouped(&self, filter: &ObservationFilter) -> Result<Vec<GroupedRecord>, StorageError>;
}
