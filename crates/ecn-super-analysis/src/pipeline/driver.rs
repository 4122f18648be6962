//! One analysis run: pick the first dirty window, group its observations,
//! resolve each group and write the summaries in batches.

use std::time::Instant;

use ecn_super_core::config::{AnalyzerConfig, GroupingMode};
use ecn_super_core::errors::{AnalyzerError, RunResult};
use ecn_super_core::filter::ObservationFilter;
use ecn_super_core::types::{GroupedRecord, RunSummary, SuperObservation, TimeRange};

use super::context::AnalyzerContext;
use super::emitter::emit;
use crate::grouping::GroupAccumulator;
use crate::resolver::ConditionResolver;

/// Summary of a run plus every group that was skipped as defective.
pub type RunReport = RunResult<RunSummary>;

/// Drives one analysis window end to end.
pub struct SuperAnalyzer {
    config: AnalyzerConfig,
    resolver: ConditionResolver,
    context: AnalyzerContext,
}

impl SuperAnalyzer {
    pub fn new(config: AnalyzerConfig, context: AnalyzerContext) -> Self {
        let resolver = ConditionResolver::new(config.effective_resolution_policy());
        Self {
            config,
            resolver,
            context,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Process the first available window.
    ///
    /// Storage failures abort the run. A group whose conditions cannot be
    /// resolved is skipped, logged, and returned in the report's errors.
    pub fn run(&mut self) -> Result<RunReport, AnalyzerError> {
        let started = Instant::now();
        let analyzer_id = self.config.effective_analyzer_id().to_string();

        let windows = self.context.windows.windows()?;
        let available = windows.spans.len();
        let Some(window) = windows.first() else {
            return Err(AnalyzerError::NoWindowAvailable { analyzer_id });
        };
        tracing::info!(
            analyzer_id = %analyzer_id,
            windows_available = available,
            "received {available} timespans, processing one"
        );
        tracing::info!(
            from = window.from,
            to = window.to,
            max_action_id = windows.max_action_id,
            policy = %self.resolver.policy(),
            grouping = %self.config.effective_grouping(),
            "analysis window selected"
        );

        let run_id =
            self.context
                .output
                .begin_run(&analyzer_id, windows.max_action_id, &window)?;

        let mut summary = RunSummary {
            run_id,
            window: Some(window),
            max_action_id: windows.max_action_id,
            windows_available: available,
            ..RunSummary::default()
        };

        let mut report = RunReport::default();
        if let Err(e) = self.process(window, &mut summary, &mut report) {
            tracing::error!(run_id, error = %e, "run aborted, discarding staged output");
            if let Err(close) = self.context.output.fail_run(run_id, &summary) {
                tracing::error!(run_id, error = %close, "failed to close aborted run");
            }
            return Err(e);
        }

        tracing::info!(
            run_id,
            groups = summary.groups,
            emitted = summary.emitted,
            skipped = summary.skipped,
            batches = summary.batches,
            status = %summary.status(),
            duration_ms = started.elapsed().as_millis() as u64,
            "analysis window complete"
        );

        report.data = summary;
        Ok(report)
    }

    /// Everything between `begin_run` and a successful `complete_run`.
    fn process(
        &mut self,
        window: TimeRange,
        summary: &mut RunSummary,
        report: &mut RunReport,
    ) -> Result<(), AnalyzerError> {
        let filter = ObservationFilter::from_config(window, &self.config);
        let groups = match self.config.effective_grouping() {
            GroupingMode::InProcess => self.group_in_process(&filter, summary)?,
            GroupingMode::InStore => self.context.input.grouped(&filter)?,
        };
        summary.groups = groups.len();

        self.resolve_and_write(groups, summary, report)?;
        self.context.output.complete_run(summary.run_id, summary)?;
        Ok(())
    }

    fn group_in_process(
        &self,
        filter: &ObservationFilter,
        summary: &mut RunSummary,
    ) -> Result<Vec<GroupedRecord>, AnalyzerError> {
        let mut accumulator = GroupAccumulator::new();
        let mut rejected = 0u64;

        let scanned = self.context.input.scan_window(&filter.window, &mut |obs| {
            if filter.accepts(&obs) {
                accumulator.fold(&ObservationFilter::retain_input_conditions(obs));
            } else {
                rejected += 1;
            }
        })?;

        summary.observations_scanned = scanned;
        summary.observations_rejected = rejected + accumulator.unkeyed();
        tracing::debug!(
            scanned,
            rejected,
            unkeyed = accumulator.unkeyed(),
            contributions = accumulator.contributions(),
            groups = accumulator.len(),
            "window grouped in process"
        );
        Ok(accumulator.seal())
    }

    fn resolve_and_write(
        &mut self,
        groups: Vec<GroupedRecord>,
        summary: &mut RunSummary,
        report: &mut RunReport,
    ) -> Result<(), AnalyzerError> {
        let batch_size = self.config.effective_batch_size();
        let mut batch: Vec<SuperObservation> = Vec::with_capacity(batch_size.min(groups.len()));

        for record in groups {
            match self.resolver.resolve(&record.conditions) {
                Ok(resolution) => {
                    batch.push(emit(record, resolution));
                    if batch.len() >= batch_size {
                        self.flush(summary, &mut batch)?;
                    }
                }
                Err(source) => {
                    tracing::error!(
                        destination = %record.key.destination,
                        location = %record.key.location,
                        conditions = ?record.conditions,
                        error = %source,
                        "skipping group"
                    );
                    summary.skipped += 1;
                    report.add_error(AnalyzerError::GroupSkipped {
                        destination: record.key.destination,
                        location: record.key.location,
                        source,
                    });
                }
            }
        }

        if !batch.is_empty() {
            self.flush(summary, &mut batch)?;
        }
        Ok(())
    }

    fn flush(
        &mut self,
        summary: &mut RunSummary,
        batch: &mut Vec<SuperObservation>,
    ) -> Result<(), AnalyzerError> {
        let rows = std::mem::take(batch);
        let len = rows.len();
        let written = self.context.output.write_batch(summary.run_id, rows)?;
        summary.emitted += len;
        summary.batches += 1;
        tracing::debug!(run_id = summary.run_id, rows = written, "batch handed to sink");
        Ok(())
    }
}

