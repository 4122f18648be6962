//! EcnErrorCode trait for structured diagnostics.

/// Every error enum implements this to expose a stable code string that
/// operators can grep for in logs.
pub trait EcnErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_ROW: &str = "CORRUPT_ROW";
pub const EMPTY_CONDITION_SET: &str = "EMPTY_CONDITION_SET";
pub const UNRECOGNIZED_CONDITION: &str = "UNRECOGNIZED_CONDITION";
pub const NO_WINDOW: &str = "NO_WINDOW";
