//! Top-level analyzer configuration with layered resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AnalyzerConfig, GroupingMode, ResolutionPolicy, StorageConfig};
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;
use crate::types::ValidityPosition;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`ECN_SUPER_*`)
/// 3. Project config (`ecn-super.toml` in the working root)
/// 4. User config (`~/.ecn-super/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuperConfig {
    pub analyzer: AnalyzerConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub resolution_policy: Option<ResolutionPolicy>,
    pub grouping: Option<GroupingMode>,
    pub timespan_hours: Option<u32>,
    pub campaign_filter: Option<bool>,
    pub validity_position: Option<ValidityPosition>,
    pub database_path: Option<String>,
}

impl SuperConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %err,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SuperConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &SuperConfig) -> Result<(), ConfigError> {
        if config.analyzer.timespan_hours == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "analyzer.timespan_hours".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.analyzer.batch_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "analyzer.batch_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref id) = config.analyzer.analyzer_id {
            if id.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "analyzer.analyzer_id".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if config.storage.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.ecn-super/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".ecn-super").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut SuperConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: SuperConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it is set.
    fn merge(base: &mut SuperConfig, other: &SuperConfig) {
        let (b, o) = (&mut base.analyzer, &other.analyzer);
        if o.analyzer_id.is_some() {
            b.analyzer_id = o.analyzer_id.clone();
        }
        if o.resolution_policy.is_some() {
            b.resolution_policy = o.resolution_policy;
        }
        if o.grouping.is_some() {
            b.grouping = o.grouping;
        }
        if o.timespan_hours.is_some() {
            b.timespan_hours = o.timespan_hours;
        }
        if o.batch_size.is_some() {
            b.batch_size = o.batch_size;
        }
        if o.campaign_filter.is_some() {
            b.campaign_filter = o.campaign_filter;
        }
        if !o.excluded_campaigns.is_empty() {
            b.excluded_campaigns = o.excluded_campaigns.clone();
        }
        if o.validity_position.is_some() {
            b.validity_position = o.validity_position;
        }

        if other.storage.database_path.is_some() {
            base.storage.database_path = other.storage.database_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `ECN_SUPER_RESOLUTION_POLICY`, `ECN_SUPER_BATCH_SIZE`, etc.
    fn apply_env_overrides(config: &mut SuperConfig) {
        if let Some(v) = env_parsed::<ResolutionPolicy>("ECN_SUPER_RESOLUTION_POLICY") {
            config.analyzer.resolution_policy = Some(v);
        }
        if let Some(v) = env_parsed::<GroupingMode>("ECN_SUPER_GROUPING") {
            config.analyzer.grouping = Some(v);
        }
        if let Some(v) = env_parsed::<u32>("ECN_SUPER_TIMESPAN_HOURS") {
            config.analyzer.timespan_hours = Some(v);
        }
        if let Some(v) = env_parsed::<usize>("ECN_SUPER_BATCH_SIZE") {
            config.analyzer.batch_size = Some(v);
        }
        if let Some(v) = env_parsed::<bool>("ECN_SUPER_CAMPAIGN_FILTER") {
            config.analyzer.campaign_filter = Some(v);
        }
        if let Some(v) = env_parsed::<ValidityPosition>("ECN_SUPER_VALIDITY_POSITION") {
            config.analyzer.validity_position = Some(v);
        }
        if let Ok(val) = std::env::var("ECN_SUPER_DATABASE_PATH") {
            config.storage.database_path = Some(val);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut SuperConfig, cli: &CliOverrides) {
        if let Some(v) = cli.resolution_policy {
            config.analyzer.resolution_policy = Some(v);
        }
        if let Some(v) = cli.grouping {
            config.analyzer.grouping = Some(v);
        }
        if let Some(v) = cli.timespan_hours {
            config.analyzer.timespan_hours = Some(v);
        }
        if let Some(v) = cli.campaign_filter {
            config.analyzer.campaign_filter = Some(v);
        }
        if let Some(v) = cli.validity_position {
            config.analyzer.validity_position = Some(v);
        }
        if let Some(ref v) = cli.database_path {
            config.storage.database_path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Read and parse an env var. Unparsable values are skipped with a warning.
fn env_parsed<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring invalid environment override");
            None
        }
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
