//! Data model for the analyzer: condition vocabulary, observations,
//! grouping keys, and windows.

pub mod collections;
pub mod condition;
pub mod observation;
pub mod run;
pub mod window;

pub use collections::FxHashMap;
pub use condition::{Condition, SuperCondition};
pub use observation::{
    ActionRef, GroupKey, GroupedRecord, ObservationId, ObservationSources, ObservationValue,
    RawObservation, SuperObservation, SuperValue, ValidityPosition,
};
pub use run::{RunStatus, RunSummary};
pub use window::{TimeRange, WindowSet};
