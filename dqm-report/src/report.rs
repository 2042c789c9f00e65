//! Report Data Structures

use chrono::{DateTime, Utc};
use dqm_stats::{EngineConfig, RunStatus, RunSummary};
use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete batch report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<RunReportResult>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub data_dir: String,
    pub config: ReportConfig,
}

/// Engine configuration captured in report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub sigma_multiplier: f64,
    pub low_threshold: f64,
    pub high_threshold: f64,
    pub expected_mean: Option<f64>,
    pub mean_tolerance: Option<f64>,
    pub jobs: usize,
}

impl ReportConfig {
    /// Capture the effective engine settings of a batch
    pub fn new(config: &EngineConfig, jobs: usize) -> Self {
        Self {
            sigma_multiplier: config.outlier_rule.sigma_multiplier,
            low_threshold: config.thresholds.low_threshold,
            high_threshold: config.thresholds.high_threshold,
            expected_mean: config.mean_band.map(|b| b.expected_mean),
            mean_tolerance: config.mean_band.map(|b| b.tolerance),
            jobs,
        }
    }
}

/// Whether the engine produced a summary for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Processed,
    Failed,
}

/// Individual run result in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReportResult {
    pub run_id: u64,
    pub file: String,
    pub outcome: RunOutcome,
    pub processed_at: DateTime<Utc>,
    pub summary: Option<RunSummary>,
    pub failure: Option<FailureInfo>,
}

impl RunReportResult {
    /// Run Store row for this run; `None` for failed runs
    pub fn record(&self) -> Option<RunRecord> {
        self.summary.as_ref().map(|s| RunRecord {
            run_id: self.run_id,
            mean: s.mean,
            stddev: s.stddev,
            outlier_count: s.outlier_count,
            status: s.status,
            processed_at: self.processed_at,
        })
    }
}

/// Failure information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureInfo {
    pub kind: String,
    pub message: String,
}

/// One row of the run store, keyed by `run_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: u64,
    pub mean: f64,
    pub stddev: f64,
    pub outlier_count: usize,
    pub status: RunStatus,
    pub processed_at: DateTime<Utc>,
}

/// Report summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_runs: usize,
    pub processed: usize,
    pub failed: usize,
    pub ok: usize,
    pub warning: usize,
    pub anomalous: usize,
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Count outcomes and statuses of a set of results
    pub fn tally(results: &[RunReportResult], total_duration_ms: f64) -> Self {
        let mut summary = ReportSummary {
            total_runs: results.len(),
            total_duration_ms,
            ..Default::default()
        };
        for result in results {
            match (&result.outcome, &result.summary) {
                (RunOutcome::Processed, Some(s)) => {
                    summary.processed += 1;
                    match s.status {
                        RunStatus::Ok => summary.ok += 1,
                        RunStatus::Warning => summary.warning += 1,
                        RunStatus::Anomalous => summary.anomalous += 1,
                    }
                }
                _ => summary.failed += 1,
            }
        }
        summary
    }
}

impl Report {
    /// Run Store rows of all processed runs, in report order
    pub fn records(&self) -> Vec<RunRecord> {
        self.results.iter().filter_map(|r| r.record()).collect()
    }

    /// Record with the highest run id
    pub fn latest(&self) -> Option<RunRecord> {
        self.records().into_iter().max_by_key(|r| r.run_id)
    }

    /// Record of one run
    pub fn find(&self, run_id: u64) -> Option<RunRecord> {
        self.results
            .iter()
            .find(|r| r.run_id == run_id)
            .and_then(|r| r.record())
    }

    /// Results that did not produce a summary
    pub fn failures(&self) -> impl Iterator<Item = &RunReportResult> {
        self.results
            .iter()
            .filter(|r| r.outcome == RunOutcome::Failed)
    }
}
