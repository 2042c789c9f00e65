//! Outlier Detection
//!
//! Sigma rule: a measurement is an outlier when it lies more than `k`
//! standard deviations away from the mean of its own run.
//!
//! Detection is a single scan against the run's original moments. Outliers are
//! counted, never removed, and the moments are never recomputed without them.

use crate::error::ConfigError;
use crate::moments::RunMoments;

/// Default sigma multiplier (3-sigma rule)
pub const DEFAULT_SIGMA_MULTIPLIER: f64 = 3.0;

/// Outlier classification rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierRule {
    /// Number of standard deviations beyond which a measurement is an outlier
    pub sigma_multiplier: f64,
}

impl Default for OutlierRule {
    fn default() -> Self {
        Self {
            sigma_multiplier: DEFAULT_SIGMA_MULTIPLIER,
        }
    }
}

impl OutlierRule {
    /// Rule with a custom multiplier
    pub fn new(sigma_multiplier: f64) -> Self {
        Self { sigma_multiplier }
    }

    /// Reject non-finite or non-positive multipliers
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sigma_multiplier.is_finite() && self.sigma_multiplier > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidSigmaMultiplier(self.sigma_multiplier))
        }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierAnalysis {
    /// Indices of outlier measurements, in input order
    pub outlier_indices: Vec<usize>,
    /// Outliers below the lower bound
    pub low_outlier_count: usize,
    /// Outliers above the upper bound
    pub high_outlier_count: usize,
    /// `mean - k * std_dev`
    pub lower_bound: f64,
    /// `mean + k * std_dev`
    pub upper_bound: f64,
    /// Number of measurements scanned
    pub sample_count: usize,
    /// Rule used for detection
    pub rule: OutlierRule,
}

impl OutlierAnalysis {
    /// Number of outliers
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }

    /// Outlier fraction in [0, 1]
    pub fn outlier_fraction(&self) -> f64 {
        if self.sample_count == 0 {
            return 0.0;
        }
        self.outlier_indices.len() as f64 / self.sample_count as f64
    }

    /// Percentage of samples that are outliers
    pub fn outlier_percentage(&self) -> f64 {
        self.outlier_fraction() * 100.0
    }
}

/// Classify every measurement against the run's own moments
///
/// With `std_dev == 0` nothing is an outlier, whatever the multiplier.
///
/// # Examples
///
/// ```
/// # use dqm_stats::{compute_moments, detect_outliers, OutlierRule};
/// let mut values = vec![10.0; 50];
/// values[0] = 9.0;
/// values[1] = 11.0;
/// values.push(1000.0);
/// let moments = compute_moments(&values).unwrap();
/// let analysis = detect_outliers(&values, &moments, OutlierRule::default());
/// assert_eq!(analysis.outlier_indices, vec![50]);
/// ```
pub fn detect_outliers(values: &[f64], moments: &RunMoments, rule: OutlierRule) -> OutlierAnalysis {
    let mean = moments.mean;
    let limit = rule.sigma_multiplier * moments.std_dev;

    let mut analysis = OutlierAnalysis {
        outlier_indices: Vec::new(),
        low_outlier_count: 0,
        high_outlier_count: 0,
        lower_bound: mean - limit,
        upper_bound: mean + limit,
        sample_count: values.len(),
        rule,
    };

    if moments.std_dev <= 0.0 {
        return analysis;
    }

    for (i, &x) in values.iter().enumerate() {
        let deviation = x - mean;
        if deviation.abs() > limit {
            analysis.outlier_indices.push(i);
            if deviation < 0.0 {
                analysis.low_outlier_count += 1;
            } else {
                analysis.high_outlier_count += 1;
            }
        }
    }

    analysis
}
