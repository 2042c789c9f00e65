//! Synthetic Run Generator
//!
//! Writes `run_NNN.csv` files of normally distributed measurements, one value
//! per line. Runs listed as anomalous are drawn from a shifted, wider
//! distribution so that a batch has something to flag.

use crate::config::GenerateConfig;
use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of a generated run
pub fn run_file_name(run_id: u64) -> String {
    format!("run_{:03}.csv", run_id)
}

/// Draw the measurements of one run
///
/// With a seed, run `i` uses `seed + i` so every file is reproducible on its own.
pub fn generate_run(run_id: u64, config: &GenerateConfig) -> anyhow::Result<Vec<f64>> {
    let (mean, std_dev) = if config.anomaly_runs.contains(&run_id) {
        (config.anomaly_mean, config.anomaly_stddev)
    } else {
        (config.nominal_mean, config.nominal_stddev)
    };
    let dist = Normal::new(mean, std_dev)
        .map_err(|e| anyhow::anyhow!("invalid distribution N({}, {}): {}", mean, std_dev, e))?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run_id)),
        None => StdRng::from_entropy(),
    };
    Ok((0..config.events_per_run)
        .map(|_| dist.sample(&mut rng))
        .collect())
}

/// Generate every configured run into `out_dir`, returning the written paths
pub fn generate_runs(out_dir: &Path, config: &GenerateConfig) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(config.runs as usize);
    for run_id in 1..=config.runs {
        let values = generate_run(run_id, config)?;
        let mut content = String::with_capacity(values.len() * 24);
        for v in &values {
            writeln!(content, "{:e}", v)?;
        }

        let path = out_dir.join(run_file_name(run_id));
        std::fs::write(&path, content)
            .with_context(|| format!("cannot write {}", path.display()))?;
        debug!(run_id, file = %path.display(), "generated run");
        written.push(path);
    }
    Ok(written)
}
