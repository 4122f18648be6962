//! Property tests for the group accumulator.

use ecn_super_analysis::GroupAccumulator;
use ecn_super_core::types::{
    ActionRef, Condition, GroupedRecord, ObservationValue, RawObservation, TimeRange,
};
use proptest::prelude::*;

fn observation() -> impl Strategy<Value = RawObservation> {
    (
        0i64..1_000,
        0i64..100,
        prop::sample::select(vec!["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
        prop::sample::select(vec!["192.0.2.1", "192.0.2.2"]),
        prop::sample::select(vec!["ams", "fra"]),
        prop::collection::vec(prop::sample::select(Condition::ALL.to_vec()), 1..4),
    )
        .prop_map(|(from, len, source, dest, location, conditions)| RawObservation {
            id: 0,
            time: TimeRange::new(from, from + len),
            path: vec![source.to_string(), dest.to_string()],
            conditions: conditions.iter().map(|c| c.label().to_string()).collect(),
            value: ObservationValue {
                location: Some(location.to_string()),
                campaign: None,
            },
            action_ids: vec![ActionRef { id: 1, valid: true }],
        })
}

fn observations() -> impl Strategy<Value = Vec<RawObservation>> {
    prop::collection::vec(observation(), 0..40).prop_map(|mut v| {
        for (i, o) in v.iter_mut().enumerate() {
            o.id = i as i64 + 1;
        }
        v
    })
}

fn fold_all<'a>(obs: impl Iterator<Item = &'a RawObservation>) -> Vec<GroupedRecord> {
    let mut acc = GroupAccumulator::new();
    for o in obs {
        acc.fold(o);
    }
    acc.seal()
}

/// Order-insensitive view of a record.
fn canonical(mut r: GroupedRecord) -> GroupedRecord {
    r.sips.sort();
    r.conditions.sort();
    r.obs.sort_unstable();
    r
}

proptest! {
    #[test]
    fn grouping_is_permutation_invariant(
        (obs, shuffled) in observations()
            .prop_flat_map(|obs| (Just(obs.clone()), Just(obs).prop_shuffle()))
    ) {
        let original: Vec<_> = fold_all(obs.iter()).into_iter().map(canonical).collect();
        let permuted: Vec<_> = fold_all(shuffled.iter()).into_iter().map(canonical).collect();
        prop_assert_eq!(original, permuted);
    }

    #[test]
    fn every_label_is_counted_once(obs in observations()) {
        let expected: usize = obs.iter().map(|o| o.conditions.len()).sum();
        let records = fold_all(obs.iter());
        let total: usize = records.iter().map(|r| r.conditions.len()).sum();
        prop_assert_eq!(total, expected);
        for r in &records {
            prop_assert_eq!(r.sips.len(), r.conditions.len());
            prop_assert_eq!(r.obs.len(), r.conditions.len());
        }
    }

    #[test]
    fn time_bounds_cover_members(obs in observations()) {
        for r in fold_all(obs.iter()) {
            for o in obs.iter().filter(|o| r.obs.contains(&o.id)) {
                prop_assert!(r.time().contains(&o.time));
            }
        }
    }
}
