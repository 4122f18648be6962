//! Run orchestration: window selection, grouping, resolution, batched
//! output.

pub mod context;
pub mod driver;
pub mod emitter;

pub use context::AnalyzerContext;
pub use driver::{RunReport, SuperAnalyzer};
pub use emitter::emit;
