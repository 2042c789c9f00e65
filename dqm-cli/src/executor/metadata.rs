//! Report Metadata
//!
//! Captures what a reader of a stored report needs to reproduce it: tool
//! version, generation time, data directory and the effective engine settings.

use super::execution::ExecutionConfig;
use chrono::Utc;
use dqm_report::{ReportConfig, ReportMeta, SCHEMA_VERSION};
use std::path::Path;

/// Build report metadata for a batch over `data_dir`
pub fn build_report_meta(config: &ExecutionConfig, data_dir: &Path) -> ReportMeta {
    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        data_dir: data_dir.display().to_string(),
        config: ReportConfig::new(&config.engine, config.jobs),
    }
}
