//! Engine Errors
//!
//! Every failure of a run is reported as an [`EngineError`]; none of them is
//! ever turned into a zero-filled summary. Invalid engine settings are a
//! separate [`ConfigError`] because they are fatal at startup, not per run.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single engine invocation
#[derive(Debug, Error)]
pub enum EngineError {
    /// The measurement source does not exist or cannot be read
    #[error("cannot read measurements from {}: {source}", path.display())]
    InputNotFound {
        /// Path that was requested
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The source contains no measurements at all
    #[error("run contains no measurements")]
    EmptyRun,

    /// A token is not a finite real number
    #[error("malformed measurement {token:?} at line {line}, column {column}: expected a finite real number")]
    MalformedMeasurement {
        /// 1-based line number
        line: usize,
        /// 1-based column (in characters) where the token starts
        column: usize,
        /// The offending token, verbatim
        token: String,
    },

    /// Accumulated statistics left the finite `f64` range
    #[error("statistics overflowed while accumulating {stage} over {count} measurements")]
    NumericOverflow {
        /// Which accumulation overflowed ("sum" or "squared deviations")
        stage: &'static str,
        /// Number of measurements in the run
        count: usize,
    },
}

/// Stable name of a failure kind, used in diagnostics and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`EngineError::InputNotFound`]
    InputNotFound,
    /// See [`EngineError::EmptyRun`]
    EmptyRun,
    /// See [`EngineError::MalformedMeasurement`]
    MalformedMeasurement,
    /// See [`EngineError::NumericOverflow`]
    NumericOverflow,
    /// See [`ConfigError`]
    ConfigurationError,
}

impl ErrorKind {
    /// Kind name as printed in diagnostics
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InputNotFound => "InputNotFound",
            ErrorKind::EmptyRun => "EmptyRun",
            ErrorKind::MalformedMeasurement => "MalformedMeasurement",
            ErrorKind::NumericOverflow => "NumericOverflow",
            ErrorKind::ConfigurationError => "ConfigurationError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EngineError {
    /// Failure kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InputNotFound { .. } => ErrorKind::InputNotFound,
            EngineError::EmptyRun => ErrorKind::EmptyRun,
            EngineError::MalformedMeasurement { .. } => ErrorKind::MalformedMeasurement,
            EngineError::NumericOverflow { .. } => ErrorKind::NumericOverflow,
        }
    }
}

/// Invalid engine settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The sigma multiplier must be finite and strictly positive
    #[error("sigma multiplier must be finite and > 0, got {0}")]
    InvalidSigmaMultiplier(f64),

    /// A status threshold is not a fraction in [0, 1]
    #[error("{name} must be a finite fraction in [0, 1], got {value}")]
    ThresholdOutOfRange {
        /// Threshold name as it appears in configuration
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// The OK/WARNING boundary lies above the WARNING/ANOMALOUS boundary
    #[error("low_threshold ({low}) must not exceed high_threshold ({high})")]
    InvalidThresholdOrder {
        /// Boundary between OK and WARNING
        low: f64,
        /// Boundary between WARNING and ANOMALOUS
        high: f64,
    },

    /// The mean drift band is not usable
    #[error("mean band needs a finite expected mean and a finite tolerance >= 0, got {expected} +/- {tolerance}")]
    InvalidMeanBand {
        /// Nominal run mean
        expected: f64,
        /// Allowed absolute drift
        tolerance: f64,
    },
}

impl ConfigError {
    /// Always [`ErrorKind::ConfigurationError`]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ConfigurationError
    }
}
