//! Core types, errors, config, tracing, and constants for the ECN
//! super-condition analyzer.

pub mod config;
pub mod constants;
pub mod errors;
pub mod filter;
pub mod tracing;
pub mod traits;
pub mod types;
