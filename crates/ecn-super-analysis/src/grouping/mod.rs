//! In-process grouping: fold raw observations into one aggregate per
//! (destination, location) key.

pub mod accumulator;

pub use accumulator::{GroupAccumulator, GroupAggregate};
