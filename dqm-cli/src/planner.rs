//! Run Planner
//!
//! Builds the execution plan by discovering run files in a data directory.
//!
//! Filtering options:
//! - Run file pattern (regex on the file name, first capture group = run id)
//! - Optional extra regex filter on the file name
//!
//! Ordering: runs are sorted by run id (then file name) for deterministic execution.

use anyhow::Context;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A run file selected for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRun {
    /// Run id parsed from the file name
    pub run_id: u64,
    /// Path of the run file
    pub path: PathBuf,
}

/// Execution plan for a batch
#[derive(Debug, Default)]
pub struct RunPlan {
    /// Ordered list of runs to process
    pub runs: Vec<PlannedRun>,
    /// Files that matched the pattern but carried no usable run id
    pub skipped: Vec<PathBuf>,
}

/// Build execution plan from the files of `data_dir`
///
/// Only regular files are considered. A missing or unreadable directory is an error.
pub fn build_plan(
    data_dir: &Path,
    pattern: &Regex,
    filter: Option<&Regex>,
) -> anyhow::Result<RunPlan> {
    let entries = std::fs::read_dir(data_dir)
        .with_context(|| format!("cannot list data directory {}", data_dir.display()))?;

    let mut plan = RunPlan::default();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("cannot list data directory {}", data_dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let Some(captures) = pattern.captures(name) else {
            continue;
        };
        if let Some(re) = filter {
            if !re.is_match(name) {
                continue;
            }
        }

        match captures.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) {
            Some(run_id) => plan.runs.push(PlannedRun { run_id, path }),
            None => {
                warn!(file = %path.display(), "run file has no numeric run id, skipping");
                plan.skipped.push(path);
            }
        }
    }

    plan.runs
        .sort_by(|a, b| a.run_id.cmp(&b.run_id).then_with(|| a.path.cmp(&b.path)));
    plan.skipped.sort();

    Ok(plan)
}
