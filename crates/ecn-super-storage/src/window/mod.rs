//! Margin computation: which spans need (re)analysis given the action log.

pub mod margin;

pub use margin::{align_spans, compute_margin, load_margin};
