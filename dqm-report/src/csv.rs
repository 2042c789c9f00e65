//! CSV Output

use crate::report::Report;

const HEADER: &str = "run_id,file,outcome,mean,stddev,outlier_count,status,processed_at,error_kind,error_message";

/// Generate a CSV report, one row per run (failed runs included).
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = String::from(HEADER);
    output.push('\n');

    for result in &report.results {
        let (mean, stddev, outliers, status) = match &result.summary {
            Some(s) => (
                s.mean.to_string(),
                s.stddev.to_string(),
                s.outlier_count.to_string(),
                s.status.to_string(),
            ),
            None => Default::default(),
        };
        let (kind, message) = match &result.failure {
            Some(f) => (f.kind.as_str(), f.message.as_str()),
            None => ("", ""),
        };
        let outcome = match result.outcome {
            crate::RunOutcome::Processed => "processed",
            crate::RunOutcome::Failed => "failed",
        };

        let fields = [
            result.run_id.to_string(),
            escape(&result.file),
            outcome.to_string(),
            mean,
            stddev,
            outliers,
            status,
            result.processed_at.to_rfc3339(),
            escape(kind),
            escape(message),
        ];
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

/// Quote a field when it contains a delimiter, quote or newline
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
