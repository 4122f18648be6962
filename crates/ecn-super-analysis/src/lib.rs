//! Condition aggregation engine: resolves each (destination, location)
//! group's condition multiset into one super condition and drives one
//! analysis window end to end.

pub mod grouping;
pub mod pipeline;
pub mod resolver;

pub use grouping::{GroupAccumulator, GroupAggregate};
pub use pipeline::{emit, AnalyzerContext, RunReport, SuperAnalyzer};
pub use resolver::ConditionResolver;
