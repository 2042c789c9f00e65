//! Run Summary
//!
//! The engine proper: one ordered run in, one [`RunSummary`] out.
//!
//! ```text
//! measurements ──► moments ──► outliers ──► status ──► RunSummary
//!                 (mean, σ)   (|x-μ| > kσ)  (fraction)
//! ```
//!
//! Every call starts from nothing but its input and configuration, so runs
//! can be summarized concurrently without any coordination.

use crate::error::{ConfigError, EngineError};
use crate::input::read_measurements;
use crate::moments::{RunMoments, compute_moments};
use crate::outliers::{OutlierAnalysis, OutlierRule, detect_outliers};
use crate::status::{MeanBand, RunStatus, StatusThresholds, classify};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    /// Sigma rule for outliers
    pub outlier_rule: OutlierRule,
    /// Severity boundaries on the outlier fraction
    pub thresholds: StatusThresholds,
    /// Optional mean drift check (off by default)
    pub mean_band: Option<MeanBand>,
}

impl EngineConfig {
    /// Check every setting; call once at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.outlier_rule.validate()?;
        self.thresholds.validate()?;
        if let Some(band) = &self.mean_band {
            band.validate()?;
        }
        Ok(())
    }
}

/// Statistical summary of one run, as emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub stddev: f64,
    /// Measurements beyond `k` standard deviations
    pub outlier_count: usize,
    /// Quality verdict
    pub status: RunStatus,
}

impl RunSummary {
    /// Single-line JSON record
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Full analysis of one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunAnalysis {
    /// Mean, standard deviation and extremes
    pub moments: RunMoments,
    /// Outlier scan against `moments`
    pub outliers: OutlierAnalysis,
    /// Status from the outlier fraction alone
    pub outlier_status: RunStatus,
    /// Final status, after the optional mean drift check
    pub status: RunStatus,
}

impl RunAnalysis {
    /// The wire summary
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            mean: self.moments.mean,
            stddev: self.moments.std_dev,
            outlier_count: self.outliers.outlier_count(),
            status: self.status,
        }
    }

    /// Whether the mean drift check changed the verdict
    pub fn escalated_by_mean(&self) -> bool {
        self.status != self.outlier_status
    }
}

/// Analyze a run already in memory
///
/// `config` must have passed [`EngineConfig::validate`]: a NaN multiplier flags
/// nothing and NaN thresholds classify every run as OK.
pub fn analyze(values: &[f64], config: &EngineConfig) -> Result<RunAnalysis, EngineError> {
    debug_assert!(config.validate().is_ok(), "unvalidated engine config: {config:?}");
    let moments = compute_moments(values)?;
    let outliers = detect_outliers(values, &moments, config.outlier_rule);
    let outlier_status = classify(outliers.outlier_count(), moments.count, &config.thresholds);
    let status = match &config.mean_band {
        Some(band) => band.apply(outlier_status, moments.mean),
        None => outlier_status,
    };

    Ok(RunAnalysis {
        moments,
        outliers,
        outlier_status,
        status,
    })
}

/// Summarize a run already in memory
///
/// # Examples
///
/// ```
/// # use dqm_stats::{summarize, EngineConfig, RunStatus};
/// let summary = summarize(&[1.0, 2.0, 3.0], &EngineConfig::default()).unwrap();
/// assert_eq!(summary.mean, 2.0);
/// assert_eq!(summary.outlier_count, 0);
/// assert_eq!(summary.status, RunStatus::Ok);
/// ```
pub fn summarize(values: &[f64], config: &EngineConfig) -> Result<RunSummary, EngineError> {
    analyze(values, config).map(|a| a.summary())
}

/// Read a run file and analyze it
pub fn analyze_file(path: impl AsRef<Path>, config: &EngineConfig) -> Result<RunAnalysis, EngineError> {
    let values = read_measurements(path)?;
    analyze(&values, config)
}

/// Read a run file and summarize it
pub fn summarize_file(path: impl AsRef<Path>, config: &EngineConfig) -> Result<RunSummary, EngineError> {
    analyze_file(path, config).map(|a| a.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Low-variance run: alternating +/- 0.1 around 10
    fn quiet_run(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| if i % 2 == 0 { 9.9 } else { 10.1 })
            .collect()
    }

    #[test]
    fn test_identical_values() {
        for (v, n) in [(0.0, 1), (-3.25, 7), (0.1, 1000), (1e12, 3)] {
            let summary = summarize(&vec![v; n], &EngineConfig::default()).unwrap();
            assert_eq!(summary.mean, v);
            assert_eq!(summary.stddev, 0.0);
            assert_eq!(summary.outlier_count, 0);
            assert_eq!(summary.status, RunStatus::Ok);
        }
    }

    #[test]
    fn test_single_measurement() {
        let summary = summarize(&[17.0], &EngineConfig::default()).unwrap();
        assert_eq!(summary.stddev, 0.0);
        assert_eq!(summary.outlier_count, 0);
        assert_eq!(summary.status, RunStatus::Ok);
    }

    #[test]
    fn test_injected_spike_adds_one_outlier() {
        let config = EngineConfig::default();
        let base = quiet_run(200);
        let before = summarize(&base, &config).unwrap();

        let mut spiked = base.clone();
        spiked.push(before.mean + 10.0 * before.stddev);
        let after = summarize(&spiked, &config).unwrap();

        assert_eq!(after.outlier_count, before.outlier_count + 1);
    }

    #[test]
    fn test_permutation_invariance() {
        let mut values: Vec<f64> = (0..300).map(|i| ((i * 37) % 101) as f64).collect();
        values.extend([900.0, -750.0, 1200.0]);
        let config = EngineConfig::default();
        let reference = summarize(&values, &config).unwrap();

        let mut reversed = values.clone();
        reversed.reverse();
        let mut rotated = values.clone();
        rotated.rotate_left(123);

        for permuted in [reversed, rotated] {
            let summary = summarize(&permuted, &config).unwrap();
            assert_eq!(summary.outlier_count, reference.outlier_count);
            assert_eq!(summary.status, reference.status);
        }
    }

    #[test]
    fn test_two_clusters_are_anomalous() {
        let mut values = vec![-50.0; 100];
        values.extend(vec![50.0; 100]);
        let config = EngineConfig {
            outlier_rule: OutlierRule::new(0.5),
            ..Default::default()
        };
        let summary = summarize(&values, &config).unwrap();
        assert_eq!(summary.outlier_count, 200);
        assert_eq!(summary.status, RunStatus::Anomalous);
    }

    #[test]
    fn test_sparse_spikes_under_default_rule() {
        // 5% of the run far away: ANOMALOUS with default thresholds
        let mut values = vec![0.0; 95];
        values.extend(vec![100.0; 5]);
        let summary = summarize(&values, &EngineConfig::default()).unwrap();
        assert_eq!(summary.outlier_count, 5);
        assert_eq!(summary.status, RunStatus::Anomalous);
    }

    #[test]
    fn test_warning_band() {
        // 2 outliers in 100
        let mut values = quiet_run(98);
        values.extend([40.0, -20.0]);
        let analysis = analyze(&values, &EngineConfig::default()).unwrap();
        assert_eq!(analysis.outliers.outlier_count(), 2);
        assert_eq!(analysis.outliers.high_outlier_count, 1);
        assert_eq!(analysis.outliers.low_outlier_count, 1);
        assert_eq!(analysis.status, RunStatus::Warning);
    }

    #[test]
    fn test_mean_band_escalates() {
        let values = vec![3.9, 4.1, 4.0, 3.95, 4.05];
        let config = EngineConfig {
            mean_band: Some(MeanBand::new(0.0, 2.0)),
            ..Default::default()
        };
        let analysis = analyze(&values, &config).unwrap();
        assert_eq!(analysis.outlier_status, RunStatus::Ok);
        assert_eq!(analysis.status, RunStatus::Anomalous);
        assert!(analysis.escalated_by_mean());
    }

    #[test]
    fn test_json_shape() {
        let summary = RunSummary {
            mean: 0.5,
            stddev: 0.25,
            outlier_count: 3,
            status: RunStatus::Warning,
        };
        assert_eq!(
            summary.to_json().unwrap(),
            r#"{"mean":0.5,"stddev":0.25,"outlier_count":3,"status":"WARNING"}"#
        );
    }

    #[test]
    fn test_json_round_trips_exactly() {
        let values: Vec<f64> = (1..=7).map(|i| 1.0 / i as f64).collect();
        let summary = summarize(&values, &EngineConfig::default()).unwrap();
        let parsed: RunSummary = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_empty_run_fails() {
        let err = summarize(&[], &EngineConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyRun);
    }

    #[test]
    fn test_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());
        let bad = EngineConfig {
            thresholds: StatusThresholds::new(0.2, 0.1),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad_band = EngineConfig {
            mean_band: Some(MeanBand::new(f64::NAN, 1.0)),
            ..Default::default()
        };
        assert!(bad_band.validate().is_err());
    }

    #[test]
    fn test_tiny_spike_is_flagged() {
        let mut values = vec![0.0; 99];
        values.push(1e-170);
        let analysis = analyze(&values, &EngineConfig::default()).unwrap();
        assert!(analysis.moments.std_dev > 0.0);
        assert_eq!(analysis.outliers.outlier_indices, vec![99]);
        assert_eq!(analysis.status, RunStatus::Warning);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unvalidated engine config")]
    fn test_unvalidated_config_rejected() {
        let config = EngineConfig {
            outlier_rule: OutlierRule::new(f64::NAN),
            ..Default::default()
        };
        let _ = analyze(&[1.0, 2.0, 3.0], &config);
    }
}
