//! Output Formatting
//!
//! Human-readable output for batch reports and single runs.
//!
//! Generates terminal-friendly output with:
//! - One line per run with a status icon (✓/!/✗/💥)
//! - Mean, standard deviation and outlier count
//! - Failure diagnostics for runs that were not processed
//! - Totals per status

use dqm_report::{Report, RunOutcome};
use dqm_stats::{RunAnalysis, RunStatus};
use std::path::Path;

fn status_icon(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Ok => "✓",
        RunStatus::Warning => "!",
        RunStatus::Anomalous => "✗",
    }
}

/// Format a batch report for human-readable terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("DQM Run Summary\n");
    output.push_str(&"=".repeat(72));
    output.push('\n');
    output.push_str(&format!(
        "data: {}  sigma: {}  thresholds: {} / {}\n",
        report.meta.data_dir,
        report.meta.config.sigma_multiplier,
        report.meta.config.low_threshold,
        report.meta.config.high_threshold
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for result in &report.results {
        match (result.outcome, &result.summary) {
            (RunOutcome::Processed, Some(s)) => {
                output.push_str(&format!(
                    "  {} run {:>4}  mean: {:>10.4}  stddev: {:>9.4}  outliers: {:>5}  {}\n",
                    status_icon(s.status),
                    result.run_id,
                    s.mean,
                    s.stddev,
                    s.outlier_count,
                    s.status
                ));
            }
            _ => {
                output.push_str(&format!("  💥 run {:>4}  not processed\n", result.run_id));
                if let Some(failure) = &result.failure {
                    output.push_str(&format!("      {}: {}\n", failure.kind, failure.message));
                }
            }
        }
    }

    let s = &report.summary;
    output.push('\n');
    output.push_str(&format!(
        "{} runs: {} OK, {} WARNING, {} ANOMALOUS, {} failed ({:.1} ms)\n",
        s.total_runs, s.ok, s.warning, s.anomalous, s.failed, s.total_duration_ms
    ));

    output
}

/// Format the analysis of a single run
pub fn format_run_analysis(path: &Path, analysis: &RunAnalysis) -> String {
    let m = &analysis.moments;
    let o = &analysis.outliers;
    let mut output = String::new();

    output.push_str(&format!("{} {}\n", status_icon(analysis.status), path.display()));
    output.push_str(&format!(
        "      mean: {:.6}  stddev: {:.6}  samples: {}\n",
        m.mean, m.std_dev, m.count
    ));
    output.push_str(&format!("      min: {:.6}  max: {:.6}\n", m.min, m.max));
    output.push_str(&format!(
        "      outliers: {} ({:.2}%, {} low / {} high) outside [{:.6}, {:.6}]\n",
        o.outlier_count(),
        o.outlier_percentage(),
        o.low_outlier_count,
        o.high_outlier_count,
        o.lower_bound,
        o.upper_bound
    ));
    output.push_str(&format!("      status: {}", analysis.status));
    if analysis.escalated_by_mean() {
        output.push_str(&format!(" (mean drift; outliers alone: {})", analysis.outlier_status));
    }
    output.push('\n');

    output
}
