//! Batch Executor
//!
//! Runs the engine over a planned batch and turns the outcomes into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PlannedRun (discovered by the planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  One engine call per run on a bounded pool
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report (summaries + failures)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Parallel run execution
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - Report metadata

mod execution;
mod formatting;
mod metadata;
mod report;

// Re-export public API
pub use execution::{ExecutionConfig, Executor, RunExecutionResult, default_jobs};
pub use formatting::{format_human_output, format_run_analysis};
pub use report::build_report;
