//! Integration tests for DQM
//!
//! These tests verify the end-to-end behavior from run files on disk to
//! summaries and batch reports.

use dqm::{
    EngineConfig, ErrorKind, MeanBand, OutlierRule, Report, RunOutcome, RunStatus,
    generate_json_lines, summarize_file,
};
use dqm_cli::{
    Cli, DqmConfig, ExecutionConfig, Executor, GenerateConfig, build_plan, build_report,
    generate_runs, run_with_cli,
};
use regex::Regex;
use std::path::Path;
use tempfile::TempDir;

fn write_run(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn run_pattern() -> Regex {
    Regex::new(&DqmConfig::default().batch.pattern).unwrap()
}

fn seeded_generator() -> GenerateConfig {
    GenerateConfig {
        runs: 20,
        events_per_run: 1000,
        seed: Some(42),
        ..Default::default()
    }
}

/// A clean file yields the documented record shape on one line
#[test]
fn test_summary_json_shape() {
    let dir = TempDir::new().unwrap();
    let path = write_run(dir.path(), "run_001.csv", "1.0\n2.0\n3.0\n4.0\n5.0\n");

    let summary = summarize_file(&path, &EngineConfig::default()).unwrap();
    let json = summary.to_json().unwrap();

    assert!(!json.contains('\n'));
    assert!(json.starts_with("{\"mean\":3.0,\"stddev\":"));
    assert!(json.ends_with("\"outlier_count\":0,\"status\":\"OK\"}"));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!((value["stddev"].as_f64().unwrap() - 2f64.sqrt()).abs() < 1e-12);
}

/// Identical input yields byte-identical output
#[test]
fn test_deterministic_output() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..500)
        .map(|i| format!("{}\n", ((i * 37) % 101) as f64 * 0.01))
        .collect();
    let a = write_run(dir.path(), "run_001.csv", &content);
    let b = write_run(dir.path(), "run_002.csv", &content);

    let config = EngineConfig::default();
    let first = summarize_file(&a, &config).unwrap().to_json().unwrap();
    let second = summarize_file(&b, &config).unwrap().to_json().unwrap();
    assert_eq!(first, second);
}

/// Comma-delimited and whitespace-delimited files parse alike
#[test]
fn test_delimited_input() {
    let dir = TempDir::new().unwrap();
    let lines = write_run(dir.path(), "a.csv", "1\n2\n3\n4\n");
    let delimited = write_run(dir.path(), "b.csv", "1, 2\n3 4\n");

    let config = EngineConfig::default();
    assert_eq!(
        summarize_file(&lines, &config).unwrap(),
        summarize_file(&delimited, &config).unwrap()
    );
}

/// Invalid inputs fail with a typed error and produce no record
#[test]
fn test_invalid_inputs() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::default();

    let empty = write_run(dir.path(), "empty.csv", "\n\n");
    let err = summarize_file(&empty, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyRun);

    let malformed = write_run(dir.path(), "bad.csv", "1.0\n2.0\nabc\n");
    let err = summarize_file(&malformed, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedMeasurement);
    assert!(err.to_string().contains("line 3"));

    let missing = dir.path().join("missing.csv");
    let err = summarize_file(&missing, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InputNotFound);
}

/// A single spike among constant values is flagged
#[test]
fn test_spike_detection() {
    let dir = TempDir::new().unwrap();
    let mut content = "10.0\n".repeat(99);
    content.push_str("1000.0\n");
    let path = write_run(dir.path(), "run_001.csv", &content);

    let summary = summarize_file(&path, &EngineConfig::default()).unwrap();
    assert_eq!(summary.outlier_count, 1);
    assert_eq!(summary.status, RunStatus::Warning);
}

/// Every value an outlier under a tight multiplier marks the run ANOMALOUS
#[test]
fn test_all_outliers_anomalous() {
    let dir = TempDir::new().unwrap();
    let content: String = (0..100)
        .map(|i| if i % 2 == 0 { "-50\n" } else { "50\n" })
        .collect();
    let path = write_run(dir.path(), "run_001.csv", &content);

    let config = EngineConfig {
        outlier_rule: OutlierRule::new(0.5),
        ..Default::default()
    };
    let summary = summarize_file(&path, &config).unwrap();
    assert_eq!(summary.outlier_count, 100);
    assert_eq!(summary.status, RunStatus::Anomalous);
}

/// Batch over generated runs with a mean band flags the shifted runs
#[test]
fn test_batch_flags_shifted_runs() {
    let dir = TempDir::new().unwrap();
    let generator = seeded_generator();
    let written = generate_runs(dir.path(), &generator).unwrap();
    assert_eq!(written.len(), 20);

    let plan = build_plan(dir.path(), &run_pattern(), None).unwrap();
    assert_eq!(plan.runs.len(), 20);

    let exec_config = ExecutionConfig {
        engine: EngineConfig {
            mean_band: Some(MeanBand::new(0.0, 2.0)),
            ..Default::default()
        },
        jobs: 4,
        show_progress: false,
    };
    let results = Executor::new(exec_config.clone())
        .execute(&plan.runs)
        .unwrap();
    let report = build_report(&results, &exec_config, dir.path(), 1.0);

    assert_eq!(report.summary.total_runs, 20);
    assert_eq!(report.summary.processed, 20);
    assert_eq!(report.summary.failed, 0);

    let anomalous: Vec<u64> = report
        .records()
        .into_iter()
        .filter(|r| r.status == RunStatus::Anomalous)
        .map(|r| r.run_id)
        .collect();
    assert_eq!(anomalous, vec![5, 12, 17]);

    // Results keep run order regardless of worker count
    let ids: Vec<u64> = report.results.iter().map(|r| r.run_id).collect();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    assert_eq!(report.latest().map(|r| r.run_id), Some(20));
}

/// Without a mean band, shifted runs with normal spread stay below the thresholds
#[test]
fn test_batch_without_mean_band() {
    let dir = TempDir::new().unwrap();
    generate_runs(dir.path(), &seeded_generator()).unwrap();

    let plan = build_plan(dir.path(), &run_pattern(), None).unwrap();
    let exec_config = ExecutionConfig {
        jobs: 2,
        show_progress: false,
        ..Default::default()
    };
    let results = Executor::new(exec_config.clone())
        .execute(&plan.runs)
        .unwrap();
    let report = build_report(&results, &exec_config, dir.path(), 1.0);

    let shifted = report.find(5).unwrap();
    assert!((shifted.mean - 4.0).abs() < 0.5);
    assert_ne!(shifted.status, RunStatus::Anomalous);
    assert_eq!(report.summary.anomalous, 0);
}

/// A broken run is reported as failed while the others are processed
#[test]
fn test_batch_isolates_failures() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), "run_001.csv", "1\n2\n3\n");
    write_run(dir.path(), "run_002.csv", "1\nnot-a-number\n");
    write_run(dir.path(), "run_003.csv", "");
    write_run(dir.path(), "notes.txt", "ignored");

    let plan = build_plan(dir.path(), &run_pattern(), None).unwrap();
    assert_eq!(plan.runs.len(), 3);

    let exec_config = ExecutionConfig {
        jobs: 2,
        show_progress: false,
        ..Default::default()
    };
    let results = Executor::new(exec_config.clone())
        .execute(&plan.runs)
        .unwrap();
    let report = build_report(&results, &exec_config, dir.path(), 1.0);

    assert_eq!(report.summary.processed, 1);
    assert_eq!(report.summary.failed, 2);
    let kinds: Vec<&str> = report
        .failures()
        .map(|r| r.failure.as_ref().unwrap().kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["MalformedMeasurement", "EmptyRun"]);
    assert!(matches!(report.results[0].outcome, RunOutcome::Processed));

    let lines = generate_json_lines(&report).unwrap();
    assert_eq!(lines.lines().count(), 1);
}

/// The batch command writes a parseable JSON report to the requested file
#[test]
fn test_batch_command_writes_report() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let mut generator = seeded_generator();
    generator.runs = 6;
    generate_runs(&data_dir, &generator).unwrap();

    let config_path = dir.path().join("dqm.toml");
    std::fs::write(&config_path, DqmConfig::default_toml()).unwrap();
    let output = dir.path().join("report.json");

    let cli = <Cli as clap::Parser>::try_parse_from([
        "dqm",
        "--config",
        config_path.to_str().unwrap(),
        "batch",
        data_dir.to_str().unwrap(),
        "--format",
        "json",
        "--output",
        output.to_str().unwrap(),
        "--no-progress",
        "--mean-tolerance",
        "2.0",
    ])
    .unwrap();
    run_with_cli(cli).unwrap();

    let report: Report =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report.summary.total_runs, 6);
    assert_eq!(report.meta.config.mean_tolerance, Some(2.0));
    assert_eq!(report.find(5).map(|r| r.status), Some(RunStatus::Anomalous));
}

/// Strict mode turns a failed run into a command error
#[test]
fn test_batch_command_strict() {
    let dir = TempDir::new().unwrap();
    write_run(dir.path(), "run_001.csv", "1\n2\n3\n");
    write_run(dir.path(), "run_002.csv", "oops\n");
    let output = dir.path().join("report.csv");

    let cli = <Cli as clap::Parser>::try_parse_from([
        "dqm",
        "batch",
        dir.path().to_str().unwrap(),
        "--format",
        "csv",
        "--output",
        output.to_str().unwrap(),
        "--no-progress",
        "--strict",
    ])
    .unwrap();
    let err = run_with_cli(cli).unwrap_err();
    assert!(err.to_string().contains("1 of 2 run(s)"));
    assert!(output.exists());
}

/// Invalid thresholds abort before any run is processed
#[test]
fn test_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_run(dir.path(), "run_001.csv", "1\n2\n3\n");

    let cli = <Cli as clap::Parser>::try_parse_from([
        "dqm",
        "summarize",
        path.to_str().unwrap(),
        "--high-threshold",
        "1.5",
    ])
    .unwrap();
    let err = run_with_cli(cli).unwrap_err();
    assert!(format!("{err:#}").starts_with("ConfigurationError"));
}
