#![warn(missing_docs)]
//! DQM Report - Batch Reporting
//!
//! Generates the output formats of a batch of runs:
//! - JSON (full report with metadata)
//! - JSON Lines (run store records, one per processed run)
//! - CSV (spreadsheet-compatible, failures included)

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::{generate_json_lines, generate_json_report};
pub use report::{
    FailureInfo, Report, ReportConfig, ReportMeta, ReportSummary, RunOutcome, RunRecord,
    RunReportResult, SCHEMA_VERSION,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// One run store record per line
    JsonLines,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "json-lines" | "ndjson" => Ok(OutputFormat::JsonLines),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
