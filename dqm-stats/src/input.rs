//! Measurement Input
//!
//! A run file holds decimal values, one per line or as comma and/or whitespace
//! separated sequences. Blank lines are ignored. Anything else that is not a
//! finite real number rejects the whole run, with its line and column.

use crate::error::EngineError;
use std::path::Path;

/// Read and parse every measurement of a run file
pub fn read_measurements(path: impl AsRef<Path>) -> Result<Vec<f64>, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    parse_measurements(&text)
}

/// Parse the textual content of a run
///
/// Fails with [`EngineError::EmptyRun`] when no measurement is found and with
/// [`EngineError::MalformedMeasurement`] on the first bad token. Empty fields
/// between commas count as malformed.
///
/// # Examples
///
/// ```
/// # use dqm_stats::parse_measurements;
/// let values = parse_measurements("1.5\n-2e-1, 3\n\n4").unwrap();
/// assert_eq!(values, vec![1.5, -0.2, 3.0, 4.0]);
/// ```
pub fn parse_measurements(text: &str) -> Result<Vec<f64>, EngineError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut values = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut field_start = 0;
        for field in line.split(',') {
            let tokens = split_tokens(field);
            if tokens.is_empty() {
                return Err(malformed(line, line_idx, field_start, ""));
            }
            for (offset, token) in tokens {
                match token.parse::<f64>() {
                    Ok(value) if value.is_finite() => values.push(value),
                    _ => return Err(malformed(line, line_idx, field_start + offset, token)),
                }
            }
            field_start += field.len() + 1;
        }
    }

    if values.is_empty() {
        return Err(EngineError::EmptyRun);
    }
    Ok(values)
}

/// Whitespace-separated tokens of a field with their byte offsets
fn split_tokens(field: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (i, c) in field.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, &field[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push((s, &field[s..]));
    }
    tokens
}

fn malformed(line: &str, line_idx: usize, byte_pos: usize, token: &str) -> EngineError {
    EngineError::MalformedMeasurement {
        line: line_idx + 1,
        column: line[..byte_pos].chars().count() + 1,
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_one_per_line() {
        let values = parse_measurements("1.0\n2.0\n3.0\n").unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_delimited_sequence() {
        let values = parse_measurements("1.0,2.0, 3.0\t4.0").unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_scientific_notation_and_crlf() {
        // np.savetxt default format
        let text = "1.000000000000000000e+00\r\n-2.500000000000000000e-01\r\n";
        let values = parse_measurements(text).unwrap();
        assert_eq!(values, vec![1.0, -0.25]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let values = parse_measurements("\n  \n5\n\n").unwrap();
        assert_eq!(values, vec![5.0]);
    }

    #[test]
    fn test_empty_input() {
        let err = parse_measurements("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyRun);

        let err = parse_measurements("\n\n   \n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyRun);
    }

    #[test]
    fn test_malformed_reports_position() {
        let err = parse_measurements("1.0\n2.0\n3.0, abc\n").unwrap_err();
        match err {
            EngineError::MalformedMeasurement {
                line,
                column,
                token,
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, 6);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        for text in ["NaN", "inf", "1.0\n-infinity"] {
            let err = parse_measurements(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedMeasurement, "{text}");
        }
    }

    #[test]
    fn test_empty_field_rejected() {
        let err = parse_measurements("1.0,,2.0").unwrap_err();
        match err {
            EngineError::MalformedMeasurement { line, column, token } => {
                assert_eq!(line, 1);
                assert_eq!(column, 5);
                assert!(token.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = read_measurements("/definitely/not/here/run_001.csv").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputNotFound);
        assert!(err.to_string().contains("run_001.csv"));
    }

    #[test]
    fn test_byte_order_mark() {
        let values = parse_measurements("\u{feff}7.5\n").unwrap();
        assert_eq!(values, vec![7.5]);
    }
}
