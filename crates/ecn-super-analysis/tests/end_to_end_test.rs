//! Full runs against an in-memory SQLite store.

use std::sync::Arc;

use ecn_super_analysis::{AnalyzerContext, SuperAnalyzer};
use ecn_super_core::config::{AnalyzerConfig, GroupingMode, ResolutionPolicy};
use ecn_super_core::errors::AnalyzerError;
use ecn_super_core::types::{
    ActionRef, ObservationValue, RawObservation, RunStatus, SuperObservation, TimeRange,
};
use ecn_super_storage::queries::{actions, observations, runs, staged};
use ecn_super_storage::DatabaseManager;

const HOUR: i64 = 3_600;

fn seed(db: &DatabaseManager) {
    db.with_writer(|conn| {
        let action = actions::insert_action(conn, "ingest", true, &TimeRange::new(0, HOUR), 1)?;
        let rows: Vec<(&str, &str, &str, Option<&str>, Vec<&str>)> = vec![
            ("10.0.0.1", "192.0.2.1", "ams", None, vec!["ecn.connectivity.works"]),
            ("10.0.0.2", "192.0.2.1", "ams", None, vec!["ecn.connectivity.broken"]),
            ("10.0.0.1", "192.0.2.2", "ams", None, vec!["ecn.connectivity.broken", "ecn.negotiation.failed"]),
            ("10.0.0.3", "192.0.2.2", "ams", None, vec!["ecn.connectivity.broken"]),
            ("10.0.0.1", "192.0.2.3", "fra", None, vec!["ecn.connectivity.offline"]),
            ("10.0.0.2", "192.0.2.3", "fra", None, vec!["ecn.connectivity.transient"]),
            ("10.0.0.1", "192.0.2.4", "fra", Some("testing"), vec!["ecn.connectivity.works"]),
        ];
        for (i, (source, dest, location, campaign, labels)) in rows.iter().enumerate() {
            let from = 60 * i as i64;
            observations::insert_observation(
                conn,
                &RawObservation {
                    id: 0,
                    time: TimeRange::new(from, from + 30),
                    path: vec![source.to_string(), dest.to_string()],
                    conditions: labels.iter().map(|l| l.to_string()).collect(),
                    value: ObservationValue {
                        location: Some(location.to_string()),
                        campaign: campaign.map(String::from),
                    },
                    action_ids: vec![ActionRef {
                        id: action,
                        valid: true,
                    }],
                },
            )?;
        }
        Ok(())
    })
    .unwrap();
}

fn run_with(config: AnalyzerConfig) -> (Arc<DatabaseManager>, i64, Vec<SuperObservation>) {
    let db = Arc::new(DatabaseManager::open_in_memory().unwrap());
    seed(&db);
    let context = AnalyzerContext::sqlite(Arc::clone(&db), &config);
    let report = SuperAnalyzer::new(config, context).run().unwrap();
    assert!(report.is_clean());
    let run_id = report.data.run_id;
    let out = db.with_reader(|conn| staged::query_by_run(conn, run_id)).unwrap();
    (db, run_id, out)
}

fn summarize(out: &[SuperObservation]) -> Vec<(String, String, String, Vec<i64>)> {
    let mut rows: Vec<_> = out
        .iter()
        .map(|o| {
            let mut obs = o.sources.obs.clone();
            obs.sort_unstable();
            (
                o.destination().unwrap_or_default().to_string(),
                o.value.location.clone(),
                o.conditions.join(","),
                obs,
            )
        })
        .collect();
    rows.sort();
    rows
}

#[test]
fn disagreement_aware_run_writes_expected_summaries() {
    let (_db, _run, out) = run_with(AnalyzerConfig::default());
    let rows = summarize(&out);
    assert_eq!(
        rows,
        vec![
            ("192.0.2.1".into(), "ams".into(), "ecn.connectivity.super.works".into(), vec![1, 2]),
            ("192.0.2.2".into(), "ams".into(), "ecn.connectivity.super.broken".into(), vec![3, 4]),
            ("192.0.2.3".into(), "fra".into(), "ecn.connectivity.super.weird".into(), vec![5, 6]),
        ]
    );
    assert!(out.iter().all(|o| o.path[0] == "*"));
}

#[test]
fn first_seen_run_differs_on_mixed_group() {
    let config = AnalyzerConfig {
        resolution_policy: Some(ResolutionPolicy::FirstSeenConsensus),
        ..AnalyzerConfig::default()
    };
    let (_db, _run, out) = run_with(config);
    let rows = summarize(&out);
    assert_eq!(rows[2].2, "ecn.connectivity.super.transient");
}

#[test]
fn in_store_grouping_matches_in_process() {
    for policy in [
        ResolutionPolicy::DisagreementAware,
        ResolutionPolicy::FirstSeenConsensus,
    ] {
        let in_process = AnalyzerConfig {
            resolution_policy: Some(policy),
            grouping: Some(GroupingMode::InProcess),
            ..AnalyzerConfig::default()
        };
        let in_store = AnalyzerConfig {
            grouping: Some(GroupingMode::InStore),
            ..in_process.clone()
        };

        let (_, _, a) = run_with(in_process);
        let (_, _, b) = run_with(in_store);
        assert_eq!(summarize(&a), summarize(&b), "policy {policy}");
    }
}

#[test]
fn completed_run_is_recorded_and_second_run_finds_nothing() {
    let (db, run_id, _) = run_with(AnalyzerConfig::default());

    let recent = db
        .with_reader(|conn| runs::query_recent(conn, "ecn-super", 5))
        .unwrap();
    assert_eq!(recent[0].id, run_id);
    assert_eq!(recent[0].status, RunStatus::Completed);
    assert_eq!(recent[0].emitted_count, Some(3));

    let config = AnalyzerConfig::default();
    let context = AnalyzerContext::sqlite(Arc::clone(&db), &config);
    let err = SuperAnalyzer::new(config, context).run().unwrap_err();
    assert!(matches!(err, AnalyzerError::NoWindowAvailable { .. }));
}
