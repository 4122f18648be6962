//! Re-exports of performance-oriented collection types.

pub use rustc_hash::FxHashMap;
pub use smallvec::SmallVec;

/// SmallVec for per-observation condition labels (usually 1-2).
pub type SmallVec4<T> = SmallVec<[T; 4]>;
