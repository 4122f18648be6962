//! Error handling for the analyzer.
//! One error enum per subsystem, `thiserror` only.

pub mod analyzer_error;
pub mod config_error;
pub mod error_code;
pub mod resolve_error;
pub mod storage_error;

pub use analyzer_error::{AnalyzerError, RunResult};
pub use config_error::ConfigError;
pub use error_code::EcnErrorCode;
pub use resolve_error::ResolveError;
pub use storage_error::StorageError;
