//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
///
/// Serializes the batch report into machine-readable JSON format.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Generate JSON Lines: one run store record per processed run.
///
/// Failed runs are left out; a loader must never see a partial row.
pub fn generate_json_lines(report: &Report) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for record in report.records() {
        output.push_str(&serde_json::to_string(&record)?);
        output.push('\n');
    }
    Ok(output)
}
