#![warn(missing_docs)]
//! DQM Run Metrics Engine
//!
//! Computes the statistical summary of one run of measurements:
//! - Mean and population standard deviation (two-pass, no cancellation)
//! - Outlier detection via the sigma rule against the run's own moments
//! - Run status from the outlier fraction (OK / WARNING / ANOMALOUS)
//! - Strict input parsing: a single bad token rejects the whole run
//!
//! The engine is pure: no state survives a call, nothing is written anywhere.

mod error;
mod input;
mod moments;
mod outliers;
mod status;
mod summary;

pub use error::{ConfigError, EngineError, ErrorKind};
pub use input::{parse_measurements, read_measurements};
pub use moments::{RunMoments, compute_moments};
pub use outliers::{DEFAULT_SIGMA_MULTIPLIER, OutlierAnalysis, OutlierRule, detect_outliers};
pub use status::{
    DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, MeanBand, RunStatus, StatusThresholds, classify,
};
pub use summary::{
    EngineConfig, RunAnalysis, RunSummary, analyze, analyze_file, summarize, summarize_file,
};
