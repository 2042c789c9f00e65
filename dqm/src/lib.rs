#![warn(missing_docs)]
//! # DQM
//!
//! Data-quality monitoring for experiment runs.
//!
//! A run is a file of numeric measurements. For each run DQM computes:
//! - **Moments**: arithmetic mean and population standard deviation
//! - **Outliers**: measurements further than `k` standard deviations from the mean (`k = 3` by default)
//! - **Status**: `OK`, `WARNING` or `ANOMALOUS` from the outlier fraction, optionally
//!   escalated when the run mean drifts out of a configured band
//!
//! The result is emitted as a single JSON record:
//!
//! ```text
//! {"mean":0.0123,"stddev":0.998,"outlier_count":3,"status":"OK"}
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use dqm::prelude::*;
//!
//! let values: Vec<f64> = (0..200).map(|i| (i % 10) as f64).collect();
//! let summary = summarize(&values, &EngineConfig::default()).unwrap();
//! assert_eq!(summary.outlier_count, 0);
//! assert_eq!(summary.status, RunStatus::Ok);
//! ```
//!
//! ## Command Line
//!
//! ```text
//! dqm summarize data/run_005.csv
//! dqm batch data --format jsonl --mean-tolerance 2.0
//! ```

// Re-export the engine
pub use dqm_stats::{
    ConfigError, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, DEFAULT_SIGMA_MULTIPLIER,
    EngineConfig, EngineError, ErrorKind, MeanBand, OutlierAnalysis, OutlierRule, RunAnalysis,
    RunMoments, RunStatus, RunSummary, StatusThresholds, analyze, analyze_file, classify,
    compute_moments, detect_outliers, parse_measurements, read_measurements, summarize,
    summarize_file,
};

// Re-export reports
pub use dqm_report::{
    OutputFormat, Report, ReportSummary, RunOutcome, RunRecord, RunReportResult,
    generate_csv_report, generate_json_lines, generate_json_report,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        EngineConfig, EngineError, MeanBand, OutlierRule, RunStatus, RunSummary,
        StatusThresholds, analyze, summarize, summarize_file,
    };
}

/// Run the `dqm` command line.
///
/// ```ignore
/// fn main() {
///     if let Err(e) = dqm::run() {
///         eprintln!("error: {:#}", e);
///         std::process::exit(1);
///     }
/// }
/// ```
pub use dqm_cli::run;
