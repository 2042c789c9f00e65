//! Run Execution
//!
//! Runs the engine over every planned run on a bounded worker pool.
//!
//! ## Data Flow
//!
//! ```text
//! PlannedRun (from planner)
//!        │
//!        ▼
//!   ExecutionConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │     Executor     │  rayon pool of `jobs` threads, one engine call per run
//! └────────┬─────────┘
//!          │
//!          ▼
//!  RunExecutionResult (analysis or engine error, timestamp)
//! ```
//!
//! Each run owns its input and configuration copy; a failing run never
//! affects the others.

use crate::planner::PlannedRun;
use chrono::{DateTime, Utc};
use dqm_stats::{EngineConfig, EngineError, RunAnalysis, analyze_file};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

/// Configuration for batch execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Engine settings (already validated)
    pub engine: EngineConfig,
    /// Number of parallel workers
    pub jobs: usize,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            jobs: default_jobs(),
            show_progress: false,
        }
    }
}

/// Number of available CPU cores
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Result from executing a single run
#[derive(Debug)]
pub struct RunExecutionResult {
    /// Run identifier from the file name
    pub run_id: u64,
    /// Run file
    pub path: PathBuf,
    /// When the engine finished this run
    pub processed_at: DateTime<Utc>,
    /// Engine wall time
    pub duration_ns: u64,
    /// Analysis, or the reason the run could not be summarized
    pub outcome: Result<RunAnalysis, EngineError>,
}

/// Batch executor
pub struct Executor {
    config: ExecutionConfig,
}

impl Executor {
    /// Create a new executor
    pub fn new(config: ExecutionConfig) -> Self {
        Self { config }
    }

    /// Execute all planned runs, results in plan order
    pub fn execute(&self, runs: &[PlannedRun]) -> anyhow::Result<Vec<RunExecutionResult>> {
        if runs.is_empty() {
            return Ok(Vec::new());
        }

        let pb = if self.config.show_progress {
            ProgressBar::new(runs.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let worker_count = self.config.jobs.clamp(1, runs.len());
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("dqm-worker-{}", i))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build worker pool: {}", e))?;

        let results: Vec<RunExecutionResult> = pool.install(|| {
            runs.par_iter()
                .map(|run| {
                    let result = self.execute_single(run);
                    pb.set_message(format!("run {}", run.run_id));
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_with_message("Complete");
        Ok(results)
    }

    /// Execute one run
    pub fn execute_single(&self, run: &PlannedRun) -> RunExecutionResult {
        let start = Instant::now();
        let outcome = analyze_file(&run.path, &self.config.engine);
        let duration_ns = start.elapsed().as_nanos() as u64;

        match &outcome {
            Ok(analysis) => debug!(
                run_id = run.run_id,
                status = %analysis.status,
                outliers = analysis.outliers.outlier_count(),
                "run processed"
            ),
            Err(e) => warn!(
                run_id = run.run_id,
                kind = %e.kind(),
                "run not processed: {}",
                e
            ),
        }

        RunExecutionResult {
            run_id: run.run_id,
            path: run.path.clone(),
            processed_at: Utc::now(),
            duration_ns,
            outcome,
        }
    }
}
