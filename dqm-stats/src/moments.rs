//! Run Moments
//!
//! Mean and **population** standard deviation of one run, computed in two
//! passes (mean first, then squared deviations from it). The run is the whole
//! population of interest, so the variance divides by `n`, not `n - 1`.
//!
//! Deviations are divided by the largest absolute deviation before squaring,
//! so neither tiny nor huge magnitudes underflow or overflow the sum.

use crate::error::EngineError;

/// Smallest positive subnormal
const SMALLEST_POSITIVE: f64 = f64::from_bits(1);

/// Central tendency and dispersion of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMoments {
    /// Number of measurements
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (always >= 0)
    pub std_dev: f64,
    /// Smallest measurement
    pub min: f64,
    /// Largest measurement
    pub max: f64,
}

impl RunMoments {
    /// Population variance
    pub fn variance(&self) -> f64 {
        self.std_dev * self.std_dev
    }

    /// Whether every measurement had the same value
    pub fn is_constant(&self) -> bool {
        self.std_dev == 0.0
    }
}

/// Compute the moments of a run
///
/// A single measurement, or a run of identical values, yields `std_dev == 0`
/// and `mean` equal to that value exactly.
pub fn compute_moments(values: &[f64]) -> Result<RunMoments, EngineError> {
    let Some(&first) = values.first() else {
        return Err(EngineError::EmptyRun);
    };
    let count = values.len();

    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), &x| (lo.min(x), hi.max(x)));

    // n * v / n is not always v in floating point
    if min == max {
        return Ok(RunMoments {
            count,
            mean: first,
            std_dev: 0.0,
            min,
            max,
        });
    }

    let sum: f64 = values.iter().sum();
    if !sum.is_finite() {
        return Err(EngineError::NumericOverflow {
            stage: "sum",
            count,
        });
    }
    let mean = sum / count as f64;

    let scale = values
        .iter()
        .fold(0.0_f64, |acc, &x| acc.max((x - mean).abs()));
    if !scale.is_finite() {
        return Err(EngineError::NumericOverflow {
            stage: "deviations",
            count,
        });
    }

    // Every term is in [0, 1] and the largest is exactly 1
    let scaled_sq_sum: f64 = values
        .iter()
        .map(|&x| {
            let r = (x - mean) / scale;
            r * r
        })
        .sum();
    // Values differ, so the spread is positive even below the subnormal range
    let std_dev = (scale * (scaled_sq_sum / count as f64).sqrt()).max(SMALLEST_POSITIVE);

    Ok(RunMoments {
        count,
        mean,
        std_dev,
        min,
        max,
    })
}
