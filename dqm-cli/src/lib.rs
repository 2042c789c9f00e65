#![warn(missing_docs)]
//! DQM CLI Library
//!
//! This module provides the CLI infrastructure of the `dqm` binary:
//!
//! - `dqm summarize <FILE>`: run the engine on one run file and emit its
//!   summary as a single JSON record (the engine invocation contract)
//! - `dqm batch [DIR]`: discover run files and summarize them on a bounded
//!   worker pool, producing a batch report
//! - `dqm generate [DIR]`: write synthetic run files
//! - `dqm init`: write a default `dqm.toml`
//!
//! # Example
//!
//! ```ignore
//! fn main() {
//!     if let Err(e) = dqm_cli::run() {
//!         eprintln!("error: {:#}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod config;
mod executor;
mod generate;
mod planner;

pub use config::*;
pub use executor::{
    ExecutionConfig, Executor, RunExecutionResult, build_report, default_jobs,
    format_human_output, format_run_analysis,
};
pub use generate::{generate_run, generate_runs, run_file_name};
pub use planner::{PlannedRun, RunPlan, build_plan};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dqm_report::{OutputFormat, generate_csv_report, generate_json_lines, generate_json_report};
use dqm_stats::{EngineConfig, EngineError, analyze, analyze_file, parse_measurements};
use regex::Regex;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// DQM CLI arguments
#[derive(Parser, Debug)]
#[command(name = "dqm")]
#[command(author, version, about = "DQM - run quality monitoring")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: dqm.toml discovered upwards from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine overrides
    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Engine settings that override the configuration file
#[derive(Args, Debug, Default, Clone)]
pub struct EngineArgs {
    /// Outlier threshold in standard deviations
    #[arg(long, global = true)]
    pub sigma: Option<f64>,

    /// Outlier fraction at which a run becomes WARNING
    #[arg(long, global = true)]
    pub low_threshold: Option<f64>,

    /// Outlier fraction at which a run becomes ANOMALOUS
    #[arg(long, global = true)]
    pub high_threshold: Option<f64>,

    /// Flag runs whose mean drifts further than this from the expected mean
    #[arg(long, global = true)]
    pub mean_tolerance: Option<f64>,

    /// Nominal run mean for the drift check
    #[arg(long, global = true)]
    pub expected_mean: Option<f64>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize one run file ("-" reads standard input)
    Summarize {
        /// Run file with one measurement per line or delimited values
        path: PathBuf,

        /// Print a human-readable analysis instead of the JSON record
        #[arg(long)]
        human: bool,
    },
    /// Summarize every run file of a directory
    Batch(BatchArgs),
    /// Write synthetic run files
    Generate {
        /// Output directory (default: batch data directory)
        out_dir: Option<PathBuf>,

        /// Number of runs
        #[arg(long)]
        runs: Option<u64>,

        /// Measurements per run
        #[arg(long)]
        events: Option<usize>,

        /// Seed for reproducible data
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Write a default dqm.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments of the batch command
#[derive(Args, Debug, Default, Clone)]
pub struct BatchArgs {
    /// Directory holding the run files (default: from dqm.toml, else ./data)
    pub data_dir: Option<PathBuf>,

    /// Only process run files whose name matches this regex
    #[arg(long)]
    pub filter: Option<String>,

    /// Number of parallel workers
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Output format: human, json, jsonl, csv
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail when any run could not be processed
    #[arg(long)]
    pub strict: bool,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Run the DQM CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error describing why the invocation failed.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the DQM CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let load = || -> anyhow::Result<DqmConfig> {
        let mut config = load_config(cli.config.as_deref())?;
        apply_engine_overrides(&mut config, &cli.engine);
        Ok(config)
    };

    match &cli.command {
        Commands::Summarize { path, human } => {
            let config = load()?;
            let engine = validated_engine(&config)?;
            summarize_command(path, *human, &engine)
        }
        Commands::Batch(args) => {
            let config = load()?;
            let engine = validated_engine(&config)?;
            batch_command(args, &config, engine)
        }
        Commands::Generate {
            out_dir,
            runs,
            events,
            seed,
        } => generate_command(out_dir.as_deref(), *runs, *events, *seed, &load()?),
        // Replaces the config file, so it never parses it
        Commands::Init { force } => init_command(*force),
    }
}

/// Initialize logging on stderr; stdout only ever carries command output
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "dqm_cli=debug"
    } else {
        "dqm_cli=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load an explicit config file, or discover `dqm.toml`, or fall back to defaults
fn load_config(path: Option<&Path>) -> anyhow::Result<DqmConfig> {
    if let Some(path) = path {
        let config = DqmConfig::load(path)
            .with_context(|| format!("ConfigurationError: cannot load {}", path.display()))?;
        debug!(file = %path.display(), "loaded configuration");
        return Ok(config);
    }
    match DqmConfig::discover().context("ConfigurationError: invalid dqm.toml")? {
        Some((path, config)) => {
            debug!(file = %path.display(), "discovered configuration");
            Ok(config)
        }
        None => Ok(DqmConfig::default()),
    }
}

/// Layer CLI engine flags over the configuration file
pub fn apply_engine_overrides(config: &mut DqmConfig, args: &EngineArgs) {
    if let Some(sigma) = args.sigma {
        config.engine.sigma_multiplier = sigma;
    }
    if let Some(low) = args.low_threshold {
        config.status.low_threshold = low;
    }
    if let Some(high) = args.high_threshold {
        config.status.high_threshold = high;
    }
    if let Some(expected) = args.expected_mean {
        config.status.expected_mean = expected;
    }
    if let Some(tolerance) = args.mean_tolerance {
        config.status.mean_tolerance = Some(tolerance);
    }
}

fn validated_engine(config: &DqmConfig) -> anyhow::Result<EngineConfig> {
    config
        .validated_engine_config()
        .context("ConfigurationError")
}

/// Attach the failure kind to an engine error
fn engine_failure(e: EngineError) -> anyhow::Error {
    let kind = e.kind();
    anyhow::Error::new(e).context(kind.as_str())
}

fn summarize_command(path: &Path, human: bool, engine: &EngineConfig) -> anyhow::Result<()> {
    let analysis = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("InputNotFound: cannot read measurements from stdin")?;
        parse_measurements(&text)
            .and_then(|values| analyze(&values, engine))
            .map_err(engine_failure)?
    } else {
        analyze_file(path, engine).map_err(engine_failure)?
    };

    let output = if human {
        format_run_analysis(path, &analysis)
    } else {
        let mut line = analysis.summary().to_json()?;
        line.push('\n');
        line
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn batch_command(args: &BatchArgs, config: &DqmConfig, engine: EngineConfig) -> anyhow::Result<()> {
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.batch.data_dir.clone());

    let pattern = Regex::new(&config.batch.pattern)
        .with_context(|| format!("ConfigurationError: invalid run pattern {:?}", config.batch.pattern))?;
    if pattern.captures_len() < 2 {
        anyhow::bail!(
            "ConfigurationError: run pattern {:?} needs a capture group for the run id",
            config.batch.pattern
        );
    }
    let filter = args
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --filter pattern")?;

    let format: OutputFormat = args
        .format
        .as_deref()
        .unwrap_or(config.output.format.as_str())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let jobs = args
        .jobs
        .or(config.batch.jobs)
        .unwrap_or_else(default_jobs)
        .max(1);

    let plan = build_plan(&data_dir, &pattern, filter.as_ref())?;
    if !plan.skipped.is_empty() {
        warn!(count = plan.skipped.len(), "skipped run files without a usable run id");
    }
    if plan.runs.is_empty() {
        info!("No run files found in {}", data_dir.display());
        return Ok(());
    }

    info!(
        runs = plan.runs.len(),
        jobs,
        data_dir = %data_dir.display(),
        "processing runs"
    );
    let start_time = Instant::now();

    let exec_config = ExecutionConfig {
        engine,
        jobs,
        show_progress: !args.no_progress,
    };
    let results = Executor::new(exec_config.clone()).execute(&plan.runs)?;

    let total_duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    let report = build_report(&results, &exec_config, &data_dir, total_duration_ms);

    let output = match format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::JsonLines => generate_json_lines(&report)?,
        OutputFormat::Csv => generate_csv_report(&report),
        OutputFormat::Human => format_human_output(&report),
    };

    if let Some(ref path) = args.output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        file.write_all(output.as_bytes())?;
        info!("Report written to: {}", path.display());
    } else {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()?;
    }

    info!(
        processed = report.summary.processed,
        failed = report.summary.failed,
        anomalous = report.summary.anomalous,
        "Orchestration complete"
    );

    if (args.strict || config.batch.strict) && report.summary.failed > 0 {
        anyhow::bail!(
            "{} of {} run(s) could not be processed",
            report.summary.failed,
            report.summary.total_runs
        );
    }
    Ok(())
}

fn generate_command(
    out_dir: Option<&Path>,
    runs: Option<u64>,
    events: Option<usize>,
    seed: Option<u64>,
    config: &DqmConfig,
) -> anyhow::Result<()> {
    let mut generate_config = config.generate.clone();
    if let Some(runs) = runs {
        generate_config.runs = runs;
    }
    if let Some(events) = events {
        generate_config.events_per_run = events;
    }
    if seed.is_some() {
        generate_config.seed = seed;
    }
    let out_dir = out_dir.unwrap_or(config.batch.data_dir.as_path());

    let paths = generate_runs(out_dir, &generate_config)?;
    info!(
        "Generated {} runs ({} measurements each) in {}",
        paths.len(),
        generate_config.events_per_run,
        out_dir.display()
    );
    Ok(())
}

fn init_command(force: bool) -> anyhow::Result<()> {
    let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
    write_default_config(&path, force)?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Write the default configuration, refusing to clobber an existing file unless forced
fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, DqmConfig::default_toml())
        .with_context(|| format!("cannot write {}", path.display()))
}
