//! Shared constants for the ECN super-condition analyzer.

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default analyzer identifier, used to tag runs and exclude the analyzer's
/// own actions from its margin.
pub const DEFAULT_ANALYZER_ID: &str = "ecn-super";

/// Namespace shared by every input and output condition label.
pub const CONDITION_NAMESPACE: &str = "ecn.connectivity";

/// Default window span in hours.
pub const DEFAULT_TIMESPAN_HOURS: u32 = 2;

/// Output records are written to the sink in batches of this size.
pub const OUTPUT_BATCH_SIZE: usize = 1000;

/// Campaigns excluded from analysis unless the filter is disabled.
pub const DEFAULT_EXCLUDED_CAMPAIGNS: [&str; 3] = ["testing", "testing-import", "testing-fi"];

/// Path element standing in for "any source" in emitted observations.
pub const WILDCARD_SOURCE: &str = "*";

/// Default SQLite database file.
pub const DEFAULT_DATABASE_PATH: &str = "ecn-super.db";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "ecn-super.toml";

/// Default read pool size.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Seconds per hour, for span arithmetic.
pub const SECONDS_PER_HOUR: i64 = 3600;
