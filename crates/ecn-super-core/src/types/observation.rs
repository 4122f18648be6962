//! Observation records: raw input, grouped intermediate, and the emitted
//! super observation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::collections::SmallVec4;
use super::window::TimeRange;

/// Unique observation identifier (the store's row id).
pub type ObservationId = i64;

/// Reference to an action that touched an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRef {
    pub id: i64,
    pub valid: bool,
}

/// Which entry of `action_ids` carries the validity flag that gates
/// eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidityPosition {
    /// The first entry (most recently applied action when actions are
    /// prepended).
    #[default]
    First,
    /// The last entry (most recently applied action when actions are
    /// appended).
    Last,
}

impl FromStr for ValidityPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => Err(format!("unknown validity position '{other}' (expected first|last)")),
        }
    }
}

impl fmt::Display for ValidityPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Last => "last",
        })
    }
}

/// Free-form value attached to a raw observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
}

/// One raw connectivity observation as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "_id")]
    pub id: ObservationId,
    pub time: TimeRange,
    /// Endpoints along the path: first is the source, last the destination.
    pub path: Vec<String>,
    pub conditions: SmallVec4<String>,
    #[serde(default)]
    pub value: ObservationValue,
    #[serde(default)]
    pub action_ids: Vec<ActionRef>,
}

impl RawObservation {
    pub fn source(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    pub fn destination(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    pub fn location(&self) -> Option<&str> {
        self.value.location.as_deref()
    }

    /// Validity flag of the action at `position`. An observation with no
    /// actions is never valid.
    pub fn is_valid_at(&self, position: ValidityPosition) -> bool {
        let action = match position {
            ValidityPosition::First => self.action_ids.first(),
            ValidityPosition::Last => self.action_ids.last(),
        };
        action.is_some_and(|a| a.valid)
    }

    /// The grouping key, if the observation has a destination and location.
    pub fn group_key(&self) -> Option<GroupKey> {
        Some(GroupKey::new(self.destination()?, self.location()?))
    }
}

/// (destination endpoint, location). Exactly one aggregate exists per key
/// within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    #[serde(rename = "dip")]
    pub destination: String,
    pub location: String,
}

impl GroupKey {
    pub fn new(destination: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.destination, self.location)
    }
}

/// A sealed group as produced by grouping, either in process or by the
/// store. Field names follow the grouped record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedRecord {
    #[serde(rename = "_id")]
    pub key: GroupKey,
    /// Source endpoints, one per contribution. Not deduplicated.
    pub sips: Vec<String>,
    pub conditions: Vec<String>,
    pub obs: Vec<ObservationId>,
    pub time_from: i64,
    pub time_to: i64,
}

impl GroupedRecord {
    /// Number of source endpoints pushed, counting repeats.
    pub fn num_sips(&self) -> usize {
        self.sips.len()
    }

    pub fn time(&self) -> TimeRange {
        TimeRange::new(self.time_from, self.time_to)
    }
}

/// Provenance of an emitted observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSources {
    pub obs: Vec<ObservationId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperValue {
    pub location: String,
}

/// One summarizing observation per group, ready for the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperObservation {
    pub time: TimeRange,
    /// Always `["*", destination]`.
    pub path: Vec<String>,
    /// Zero or one super condition label.
    pub conditions: Vec<String>,
    pub sources: ObservationSources,
    pub value: SuperValue,
}

impl SuperObservation {
    pub fn destination(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn observation(actions: Vec<ActionRef>) -> RawObservation {
        RawObservation {
            id: 1,
            time: TimeRange::new(0, 10),
            path: vec!["10.0.0.1".into(), "hop".into(), "192.0.2.7".into()],
            conditions: smallvec!["ecn.connectivity.works".to_string()],
            value: ObservationValue {
                location: Some("ams".into()),
                campaign: None,
            },
            action_ids: actions,
        }
    }

    #[test]
    fn validity_position_selects_entry() {
        let obs = observation(vec![
            ActionRef { id: 7, valid: true },
            ActionRef { id: 3, valid: false },
        ]);
        assert!(obs.is_valid_at(ValidityPosition::First));
        assert!(!obs.is_valid_at(ValidityPosition::Last));
    }

    #[test]
    fn no_actions_is_invalid() {
        let obs = observation(Vec::new());
        assert!(!obs.is_valid_at(ValidityPosition::First));
        assert!(!obs.is_valid_at(ValidityPosition::Last));
    }

    #[test]
    fn group_key_uses_last_path_element() {
        let obs = observation(Vec::new());
        assert_eq!(obs.source(), Some("10.0.0.1"));
        assert_eq!(obs.group_key(), Some(GroupKey::new("192.0.2.7", "ams")));
    }

    #[test]
    fn raw_observation_json_uses_store_field_names() {
        let obs = observation(vec![ActionRef { id: 1, valid: true }]);
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json["_id"], 1);
        assert_eq!(json["time"]["from"], 0);
        assert_eq!(json["value"]["location"], "ams");
        assert!(json["value"].get("campaign").is_none());
    }
}
