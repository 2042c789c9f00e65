//! Report Building
//!
//! Constructs the batch report from execution results.
//!
//! ## Pipeline
//!
//! ```text
//! RunExecutionResult (analysis or engine error)
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │   RunReportResult   │  summary for processed runs,
//!   │                     │  kind + diagnostic for failed ones
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │      Report         │  Ready for JSON/JSONL/CSV/human output
//!   └─────────────────────┘
//! ```
//!
//! A failed run never gets a zero-filled summary: it appears with
//! `outcome = failed` and no summary at all.

use super::execution::{ExecutionConfig, RunExecutionResult};
use super::metadata::build_report_meta;
use dqm_report::{FailureInfo, Report, ReportSummary, RunOutcome, RunReportResult};
use std::path::Path;

/// Build a complete Report from execution results
///
/// # Arguments
/// * `results` - Run execution results, in plan order
/// * `config` - Execution configuration (captured in the metadata)
/// * `data_dir` - Directory the runs were discovered in
/// * `total_duration_ms` - Total execution time in milliseconds
pub fn build_report(
    results: &[RunExecutionResult],
    config: &ExecutionConfig,
    data_dir: &Path,
    total_duration_ms: f64,
) -> Report {
    let run_results: Vec<RunReportResult> = results
        .iter()
        .map(|result| {
            let (outcome, summary, failure) = match &result.outcome {
                Ok(analysis) => (RunOutcome::Processed, Some(analysis.summary()), None),
                Err(e) => (
                    RunOutcome::Failed,
                    None,
                    Some(FailureInfo {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    }),
                ),
            };
            RunReportResult {
                run_id: result.run_id,
                file: result.path.display().to_string(),
                outcome,
                processed_at: result.processed_at,
                summary,
                failure,
            }
        })
        .collect();

    let summary = ReportSummary::tally(&run_results, total_duration_ms);

    Report {
        meta: build_report_meta(config, data_dir),
        results: run_results,
        summary,
    }
}
