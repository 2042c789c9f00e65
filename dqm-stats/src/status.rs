//! Status Classification
//!
//! Maps the outlier fraction of a run onto an ordered set of severities:
//!
//! ```text
//!   0 ──────── low_threshold ──────── high_threshold ──────── 1
//!        OK               WARNING                 ANOMALOUS
//! ```
//!
//! Lower bounds are inclusive: a fraction equal to `low_threshold` is a
//! WARNING, one equal to `high_threshold` is ANOMALOUS.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default boundary between OK and WARNING (1% outliers)
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.01;

/// Default boundary between WARNING and ANOMALOUS (5% outliers)
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.05;

/// Run-level quality verdict, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    /// Outlier fraction below the low threshold
    Ok,
    /// Outlier fraction between the thresholds
    Warning,
    /// Outlier fraction at or above the high threshold, or mean drift
    Anomalous,
}

impl RunStatus {
    /// Label as emitted on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Ok => "OK",
            RunStatus::Warning => "WARNING",
            RunStatus::Anomalous => "ANOMALOUS",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OK" => Ok(RunStatus::Ok),
            "WARNING" => Ok(RunStatus::Warning),
            "ANOMALOUS" => Ok(RunStatus::Anomalous),
            other => Err(format!("Unknown run status: {}", other)),
        }
    }
}

/// Outlier-fraction boundaries between severities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusThresholds {
    /// Boundary between OK and WARNING
    pub low_threshold: f64,
    /// Boundary between WARNING and ANOMALOUS
    pub high_threshold: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            high_threshold: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl StatusThresholds {
    /// Thresholds with custom boundaries (not validated)
    pub fn new(low_threshold: f64, high_threshold: f64) -> Self {
        Self {
            low_threshold,
            high_threshold,
        }
    }

    /// Both boundaries must be fractions in [0, 1] with `low <= high`
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("low_threshold", self.low_threshold),
            ("high_threshold", self.high_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if self.low_threshold > self.high_threshold {
            return Err(ConfigError::InvalidThresholdOrder {
                low: self.low_threshold,
                high: self.high_threshold,
            });
        }
        Ok(())
    }

    /// Severity of an outlier fraction
    pub fn classify_fraction(&self, fraction: f64) -> RunStatus {
        if fraction >= self.high_threshold {
            RunStatus::Anomalous
        } else if fraction >= self.low_threshold {
            RunStatus::Warning
        } else {
            RunStatus::Ok
        }
    }
}

/// Map an outlier count to a status
///
/// An empty run has fraction 0 and is therefore OK; the engine never gets
/// that far because empty runs are rejected earlier.
pub fn classify(outlier_count: usize, total_count: usize, thresholds: &StatusThresholds) -> RunStatus {
    let fraction = if total_count == 0 {
        0.0
    } else {
        outlier_count as f64 / total_count as f64
    };
    thresholds.classify_fraction(fraction)
}

/// Allowed drift of a run mean around its nominal value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanBand {
    /// Nominal run mean
    pub expected_mean: f64,
    /// Maximum absolute distance from `expected_mean`
    pub tolerance: f64,
}

impl MeanBand {
    /// Band around `expected_mean`
    pub fn new(expected_mean: f64, tolerance: f64) -> Self {
        Self {
            expected_mean,
            tolerance,
        }
    }

    /// Expected mean and tolerance must be finite, tolerance non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.expected_mean.is_finite() && self.tolerance.is_finite() && self.tolerance >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidMeanBand {
                expected: self.expected_mean,
                tolerance: self.tolerance,
            })
        }
    }

    /// Whether `mean` lies inside the band (edges included)
    pub fn contains(&self, mean: f64) -> bool {
        (mean - self.expected_mean).abs() <= self.tolerance
    }

    /// Escalate to ANOMALOUS when the mean drifted out of the band
    pub fn apply(&self, status: RunStatus, mean: f64) -> RunStatus {
        if self.contains(mean) {
            status
        } else {
            RunStatus::Anomalous
        }
    }
}
