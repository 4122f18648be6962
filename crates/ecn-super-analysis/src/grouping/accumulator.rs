//! Group accumulator.
//!
//! Every condition label on an observation contributes one entry to its
//! group's parallel sequences (source, condition, observation id), so an
//! observation carrying two labels appears twice. Sealing consumes the
//! accumulator and returns the groups sorted by key.

use ecn_super_core::types::{
    FxHashMap, GroupKey, GroupedRecord, ObservationId, RawObservation, TimeRange,
};

/// Running aggregate for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAggregate {
    sources: Vec<String>,
    conditions: Vec<String>,
    observation_ids: Vec<ObservationId>,
    time: TimeRange,
}

impl GroupAggregate {
    fn new(time: TimeRange) -> Self {
        Self {
            sources: Vec::new(),
            conditions: Vec::new(),
            observation_ids: Vec::new(),
            time,
        }
    }

    fn push(&mut self, source: &str, condition: &str, id: ObservationId, time: &TimeRange) {
        self.sources.push(source.to_string());
        self.conditions.push(condition.to_string());
        self.observation_ids.push(id);
        self.time.extend(time);
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn time(&self) -> TimeRange {
        self.time
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn seal(self, key: GroupKey) -> GroupedRecord {
        GroupedRecord {
            key,
            sips: self.sources,
            conditions: self.conditions,
            obs: self.observation_ids,
            time_from: self.time.from,
            time_to: self.time.to,
        }
    }
}

/// Folds observations into per-key aggregates.
#[derive(Debug, Default)]
pub struct GroupAccumulator {
    groups: FxHashMap<GroupKey, GroupAggregate>,
    contributions: u64,
    unkeyed: u64,
}

impl GroupAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one observation. Returns the number of condition entries it
    /// contributed. Observations without a destination or location, or
    /// without conditions, contribute nothing.
    pub fn fold(&mut self, obs: &RawObservation) -> usize {
        let (Some(key), Some(source)) = (obs.group_key(), obs.source()) else {
            self.unkeyed += 1;
            return 0;
        };
        if obs.conditions.is_empty() {
            return 0;
        }

        let aggregate = self
            .groups
            .entry(key)
            .or_insert_with(|| GroupAggregate::new(obs.time));
        for condition in &obs.conditions {
            aggregate.push(source, condition, obs.id, &obs.time);
        }

        let added = obs.conditions.len();
        self.contributions += added as u64;
        added
    }

    pub fn get(&self, key: &GroupKey) -> Option<&GroupAggregate> {
        self.groups.get(key)
    }

    /// Number of groups seen so far.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total condition entries folded across all groups.
    pub fn contributions(&self) -> u64 {
        self.contributions
    }

    /// Observations dropped for lacking a grouping key.
    pub fn unkeyed(&self) -> u64 {
        self.unkeyed
    }

    /// Close the accumulator and hand out every group, ordered by key.
    pub fn seal(self) -> Vec<GroupedRecord> {
        let mut records: Vec<GroupedRecord> = self
            .groups
            .into_iter()
            .map(|(key, aggregate)| aggregate.seal(key))
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }
}

#[cfg(test)]
mod tests {
    use ecn_super_core::types::{ActionRef, ObservationValue};

    use super::*;

    fn obs(id: i64, source: &str, dest: &str, location: &str, labels: &[&str]) -> RawObservation {
        RawObservation {
            id,
            time: TimeRange::new(100 + id, 200 + id),
            path: vec![source.into(), "*".into(), dest.into()],
            conditions: labels.iter().map(|l| l.to_string()).collect(),
            value: ObservationValue {
                location: Some(location.into()),
                campaign: None,
            },
            action_ids: vec![ActionRef { id: 1, valid: true }],
        }
    }

    #[test]
    fn multi_label_observation_contributes_per_label() {
        let mut acc = GroupAccumulator::new();
        let added = acc.fold(&obs(
            1,
            "10.0.0.1",
            "192.0.2.1",
            "ams",
            &["ecn.connectivity.works", "ecn.connectivity.broken"],
        ));
        assert_eq!(added, 2);

        let records = acc.seal();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sips, vec!["10.0.0.1", "10.0.0.1"]);
        assert_eq!(records[0].obs, vec![1, 1]);
    }

    #[test]
    fn time_range_covers_all_contributors() {
        let mut acc = GroupAccumulator::new();
        acc.fold(&obs(5, "a", "d", "ams", &["ecn.connectivity.works"]));
        acc.fold(&obs(2, "b", "d", "ams", &["ecn.connectivity.offline"]));
        acc.fold(&obs(9, "c", "d", "ams", &["ecn.connectivity.broken"]));

        let key = GroupKey::new("d", "ams");
        assert_eq!(acc.get(&key).map(|g| g.time()), Some(TimeRange::new(102, 209)));
        assert_eq!(acc.contributions(), 3);
    }

    #[test]
    fn same_destination_different_location_split() {
        let mut acc = GroupAccumulator::new();
        acc.fold(&obs(1, "a", "d", "ams", &["ecn.connectivity.works"]));
        acc.fold(&obs(2, "a", "d", "fra", &["ecn.connectivity.works"]));
        assert_eq!(acc.len(), 2);
    }

    #[test]
    fn seal_orders_by_destination_then_location() {
        let mut acc = GroupAccumulator::new();
        acc.fold(&obs(1, "a", "d2", "ams", &["ecn.connectivity.works"]));
        acc.fold(&obs(2, "a", "d1", "fra", &["ecn.connectivity.works"]));
        acc.fold(&obs(3, "a", "d1", "ams", &["ecn.connectivity.works"]));

        let keys: Vec<_> = acc.seal().into_iter().map(|r| r.key).collect();
        assert_eq!(
            keys,
            vec![
                GroupKey::new("d1", "ams"),
                GroupKey::new("d1", "fra"),
                GroupKey::new("d2", "ams"),
            ]
        );
    }

    #[test]
    fn observation_without_location_is_unkeyed() {
        let mut o = obs(1, "a", "d", "ams", &["ecn.connectivity.works"]);
        o.value.location = None;

        let mut acc = GroupAccumulator::new();
        assert_eq!(acc.fold(&o), 0);
        assert_eq!(acc.unkeyed(), 1);
        assert!(acc.is_empty());
    }

    #[test]
    fn observation_without_conditions_creates_no_group() {
        let mut acc = GroupAccumulator::new();
        assert_eq!(acc.fold(&obs(1, "a", "d", "ams", &[])), 0);
        assert!(acc.is_empty());
    }
}
