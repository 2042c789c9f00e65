//! Configuration loading from dqm.toml
//!
//! DQM configuration can be specified in a `dqm.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use dqm_stats::{
    ConfigError, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, DEFAULT_SIGMA_MULTIPLIER,
    EngineConfig, MeanBand, OutlierRule, StatusThresholds,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up by [`DqmConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "dqm.toml";

/// DQM configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DqmConfig {
    /// Outlier rule
    #[serde(default)]
    pub engine: EngineSection,
    /// Status policy
    #[serde(default)]
    pub status: StatusSection,
    /// Batch orchestration
    #[serde(default)]
    pub batch: BatchConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Synthetic data generation
    #[serde(default)]
    pub generate: GenerateConfig,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Standard deviations beyond which a measurement is an outlier
    #[serde(default = "default_sigma_multiplier")]
    pub sigma_multiplier: f64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            sigma_multiplier: default_sigma_multiplier(),
        }
    }
}

fn default_sigma_multiplier() -> f64 {
    DEFAULT_SIGMA_MULTIPLIER
}

/// Status classification policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSection {
    /// Outlier fraction at which a run becomes WARNING
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f64,
    /// Outlier fraction at which a run becomes ANOMALOUS
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,
    /// Nominal run mean for the drift check
    #[serde(default)]
    pub expected_mean: f64,
    /// Allowed drift of the run mean; the check is off when unset
    #[serde(default)]
    pub mean_tolerance: Option<f64>,
}

impl Default for StatusSection {
    fn default() -> Self {
        Self {
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
            expected_mean: 0.0,
            mean_tolerance: None,
        }
    }
}

fn default_low_threshold() -> f64 {
    DEFAULT_LOW_THRESHOLD
}
fn default_high_threshold() -> f64 {
    DEFAULT_HIGH_THRESHOLD
}

/// Batch orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Directory holding the run files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name pattern; the first capture group is the run id
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Number of parallel workers (defaults to available parallelism)
    #[serde(default)]
    pub jobs: Option<usize>,
    /// Exit with an error when any run could not be processed
    #[serde(default)]
    pub strict: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            pattern: default_pattern(),
            jobs: None,
            strict: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_pattern() -> String {
    r"^run_(\d+)\.csv$".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default batch output format: "human", "json", "jsonl", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

/// Synthetic data generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Number of runs to generate
    #[serde(default = "default_runs")]
    pub runs: u64,
    /// Measurements per run
    #[serde(default = "default_events_per_run")]
    pub events_per_run: usize,
    /// Run ids that get the anomalous distribution
    #[serde(default = "default_anomaly_runs")]
    pub anomaly_runs: Vec<u64>,
    /// Mean of normal runs
    #[serde(default)]
    pub nominal_mean: f64,
    /// Standard deviation of normal runs
    #[serde(default = "default_nominal_stddev")]
    pub nominal_stddev: f64,
    /// Mean of anomalous runs
    #[serde(default = "default_anomaly_mean")]
    pub anomaly_mean: f64,
    /// Standard deviation of anomalous runs
    #[serde(default = "default_anomaly_stddev")]
    pub anomaly_stddev: f64,
    /// Seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            events_per_run: default_events_per_run(),
            anomaly_runs: default_anomaly_runs(),
            nominal_mean: 0.0,
            nominal_stddev: default_nominal_stddev(),
            anomaly_mean: default_anomaly_mean(),
            anomaly_stddev: default_anomaly_stddev(),
            seed: None,
        }
    }
}

fn default_runs() -> u64 {
    20
}
fn default_events_per_run() -> usize {
    1000
}
fn default_anomaly_runs() -> Vec<u64> {
    vec![5, 12, 17]
}
fn default_nominal_stddev() -> f64 {
    1.0
}
fn default_anomaly_mean() -> f64 {
    4.0
}
fn default_anomaly_stddev() -> f64 {
    2.0
}

impl DqmConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    ///
    /// A file that exists but does not parse is an error, not a silent fallback.
    pub fn discover() -> anyhow::Result<Option<(PathBuf, Self)>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Engine settings described by this configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            outlier_rule: OutlierRule::new(self.engine.sigma_multiplier),
            thresholds: StatusThresholds::new(
                self.status.low_threshold,
                self.status.high_threshold,
            ),
            mean_band: self
                .status
                .mean_tolerance
                .map(|tolerance| MeanBand::new(self.status.expected_mean, tolerance)),
        }
    }

    /// Validated engine settings
    pub fn validated_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = self.engine_config();
        config.validate()?;
        Ok(config)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# DQM Configuration

[engine]
# A measurement is an outlier when |x - mean| > sigma_multiplier * stddev
sigma_multiplier = 3.0

[status]
# Outlier fraction at which a run becomes WARNING
low_threshold = 0.01
# Outlier fraction at which a run becomes ANOMALOUS
high_threshold = 0.05
# Flag runs whose mean drifts away from the nominal value (uncomment to enable)
# expected_mean = 0.0
# mean_tolerance = 2.0

[batch]
# Directory holding the run files
data_dir = "data"
# Run file name pattern; the first capture group is the run id
pattern = '^run_(\d+)\.csv$'
# Number of parallel workers (uncomment to enable, default: all cores)
# jobs = 4
# Exit with an error when any run could not be processed
strict = false

[output]
# Default batch output format: human, json, jsonl, csv
format = "human"

[generate]
# Number of runs and measurements per run
runs = 20
events_per_run = 1000
# Runs drawn from the anomalous distribution
anomaly_runs = [5, 12, 17]
nominal_mean = 0.0
nominal_stddev = 1.0
anomaly_mean = 4.0
anomaly_stddev = 2.0
# Seed for reproducible data (uncomment to enable)
# seed = 42
"#
        .to_string()
    }
}
