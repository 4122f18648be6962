//! Eligibility predicates applied before grouping.
//!
//! An observation is eligible when the selected action is valid, it has at
//! least one input condition, it has a location, its time bounds lie inside
//! the window, and (with the campaign filter on) its campaign is not
//! excluded. A missing campaign is never excluded.

use crate::config::AnalyzerConfig;
use crate::types::{Condition, RawObservation, TimeRange, ValidityPosition};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationFilter {
    pub window: TimeRange,
    /// `None` disables campaign exclusion.
    pub excluded_campaigns: Option<Vec<String>>,
    pub validity_position: ValidityPosition,
}

impl ObservationFilter {
    pub fn new(window: TimeRange) -> Self {
        Self {
            window,
            excluded_campaigns: None,
            validity_position: ValidityPosition::default(),
        }
    }

    pub fn from_config(window: TimeRange, config: &AnalyzerConfig) -> Self {
        Self {
            window,
            excluded_campaigns: config.effective_excluded_campaigns(),
            validity_position: config.effective_validity_position(),
        }
    }

    pub fn with_excluded_campaigns(mut self, campaigns: Vec<String>) -> Self {
        self.excluded_campaigns = Some(campaigns);
        self
    }

    pub fn with_validity_position(mut self, position: ValidityPosition) -> Self {
        self.validity_position = position;
        self
    }

    pub fn accepts(&self, obs: &RawObservation) -> bool {
        obs.is_valid_at(self.validity_position)
            && obs.conditions.iter().any(|c| Condition::is_input_label(c))
            && obs.location().is_some()
            && self.window.contains(&obs.time)
            && !self.is_excluded_campaign(obs.value.campaign.as_deref())
    }

    fn is_excluded_campaign(&self, campaign: Option<&str>) -> bool {
        match (&self.excluded_campaigns, campaign) {
            (Some(excluded), Some(campaign)) => excluded.iter().any(|e| e == campaign),
            _ => false,
        }
    }

    /// Drop condition labels outside the input vocabulary, so that only
    /// input conditions are unwound into groups.
    pub fn retain_input_conditions(mut obs: RawObservation) -> RawObservation {
        obs.conditions.retain(|c| Condition::is_input_label(c));
        obs
    }
}
