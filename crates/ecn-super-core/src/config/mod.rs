//! Configuration system for the analyzer.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod analyzer_config;
pub mod storage_config;
pub mod super_config;

pub use analyzer_config::{AnalyzerConfig, GroupingMode, ResolutionPolicy};
pub use storage_config::StorageConfig;
pub use super_config::{CliOverrides, SuperConfig};
