//! Summary observation construction.

use ecn_super_core::constants::WILDCARD_SOURCE;
use ecn_super_core::types::{
    GroupedRecord, ObservationSources, SuperCondition, SuperObservation, SuperValue,
};

/// Build the summary observation for one resolved group.
///
/// The path is always `["*", destination]`: the record speaks for every
/// source that contributed. Provenance keeps one observation id per
/// contributing condition, duplicates included.
pub fn emit(record: GroupedRecord, resolution: SuperCondition) -> SuperObservation {
    let time = record.time();
    let GroupedRecord { key, obs, .. } = record;

    SuperObservation {
        time,
        path: vec![WILDCARD_SOURCE.to_string(), key.destination],
        conditions: vec![resolution.label().to_string()],
        sources: ObservationSources { obs },
        value: SuperValue {
            location: key.location,
        },
    }
}

#[cfg(test)]
mod tests {
    use ecn_super_core::types::{GroupKey, TimeRange};

    use super::*;

    fn record() -> GroupedRecord {
        GroupedRecord {
            key: GroupKey::new("192.0.2.7", "ams"),
            sips: vec!["10.0.0.1".into(), "10.0.0.2".into(), "10.0.0.1".into()],
            conditions: vec![
                "ecn.connectivity.works".into(),
                "ecn.connectivity.broken".into(),
                "ecn.connectivity.works".into(),
            ],
            obs: vec![7, 8, 7],
            time_from: 1_000,
            time_to: 4_000,
        }
    }

    #[test]
    fn emits_wildcard_path_and_single_label() {
        let out = emit(record(), SuperCondition::Works);
        assert_eq!(out.path, vec!["*", "192.0.2.7"]);
        assert_eq!(out.conditions, vec!["ecn.connectivity.super.works"]);
        assert_eq!(out.value.location, "ams");
        assert_eq!(out.time, TimeRange::new(1_000, 4_000));
    }

    #[test]
    fn provenance_keeps_duplicates() {
        let out = emit(record(), SuperCondition::Weird);
        assert_eq!(out.sources.obs, vec![7, 8, 7]);
    }

    #[test]
    fn serialized_shape_matches_store_layout() {
        let json = serde_json::to_value(emit(record(), SuperCondition::Offline)).unwrap();
        assert_eq!(json["path"], serde_json::json!(["*", "192.0.2.7"]));
        assert_eq!(json["sources"]["obs"], serde_json::json!([7, 8, 7]));
        assert_eq!(json["value"]["location"], "ams");
        assert_eq!(json["time"]["from"], 1_000);
    }
}
