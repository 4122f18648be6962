//! Analyzer configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ANALYZER_ID, DEFAULT_EXCLUDED_CAMPAIGNS, DEFAULT_TIMESPAN_HOURS, OUTPUT_BATCH_SIZE,
};
use crate::types::ValidityPosition;

/// How a group's condition multiset is reduced to one super condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionPolicy {
    /// Tracks whether ECN and non-ECN connections were ever seen working and
    /// reports disagreement as `weird`.
    #[default]
    DisagreementAware,
    /// `works` wins outright; otherwise all-equal labels keep their value and
    /// any mismatch becomes `transient`.
    FirstSeenConsensus,
}

impl ResolutionPolicy {
    pub fn name(self) -> &'static str {
        match self {
            Self::DisagreementAware => "disagreement-aware",
            Self::FirstSeenConsensus => "first-seen-consensus",
        }
    }
}

impl FromStr for ResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disagreement-aware" => Ok(Self::DisagreementAware),
            "first-seen-consensus" => Ok(Self::FirstSeenConsensus),
            other => Err(format!(
                "unknown resolution policy '{other}' (expected disagreement-aware|first-seen-consensus)"
            )),
        }
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where observations are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingMode {
    /// Scan eligible observations and fold them in the analyzer.
    #[default]
    InProcess,
    /// Let the store unwind and group, and consume grouped records.
    InStore,
}

impl FromStr for GroupingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-process" => Ok(Self::InProcess),
            "in-store" => Ok(Self::InStore),
            other => Err(format!("unknown grouping mode '{other}' (expected in-process|in-store)")),
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProcess => "in-process",
            Self::InStore => "in-store",
        })
    }
}

/// Configuration for one analyzer run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Identifier used for run bookkeeping. Default: "ecn-super".
    pub analyzer_id: Option<String>,
    /// Resolution policy. Default: disagreement-aware.
    pub resolution_policy: Option<ResolutionPolicy>,
    /// Grouping mode. Default: in-process.
    pub grouping: Option<GroupingMode>,
    /// Window span in hours. Default: 2.
    pub timespan_hours: Option<u32>,
    /// Output batch size. Default: 1000.
    pub batch_size: Option<usize>,
    /// Exclude observations from `excluded_campaigns`. Default: true.
    pub campaign_filter: Option<bool>,
    /// Campaigns to exclude. Empty means the built-in list.
    #[serde(default)]
    pub excluded_campaigns: Vec<String>,
    /// Which action entry carries the validity flag. Default: first.
    pub validity_position: Option<ValidityPosition>,
}

impl AnalyzerConfig {
    pub fn effective_analyzer_id(&self) -> &str {
        self.analyzer_id.as_deref().unwrap_or(DEFAULT_ANALYZER_ID)
    }

    pub fn effective_resolution_policy(&self) -> ResolutionPolicy {
        self.resolution_policy.unwrap_or_default()
    }

    pub fn effective_grouping(&self) -> GroupingMode {
        self.grouping.unwrap_or_default()
    }

    pub fn effective_timespan_hours(&self) -> u32 {
        self.timespan_hours.unwrap_or(DEFAULT_TIMESPAN_HOURS)
    }

    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(OUTPUT_BATCH_SIZE)
    }

    pub fn effective_campaign_filter(&self) -> bool {
        self.campaign_filter.unwrap_or(true)
    }

    /// Campaigns to exclude, or `None` when the campaign filter is off.
    pub fn effective_excluded_campaigns(&self) -> Option<Vec<String>> {
        if !self.effective_campaign_filter() {
            return None;
        }
        if self.excluded_campaigns.is_empty() {
            Some(DEFAULT_EXCLUDED_CAMPAIGNS.iter().map(|c| c.to_string()).collect())
        } else {
            Some(self.excluded_campaigns.clone())
        }
    }

    pub fn effective_validity_position(&self) -> ValidityPosition {
        self.validity_position.unwrap_or_default()
    }
}
