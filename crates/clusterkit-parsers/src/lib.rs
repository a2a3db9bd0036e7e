//! Shared parsing utilities for cluster log and report files.
//!
//! This crate provides the small text helpers used by both
//! clusterkit-batch and clusterkit-quota.

pub mod command;

pub use command::{CommandError, run_command_allow_failure, run_command_with_timeout};

/// Trimmed copy of `s`, or None if nothing but whitespace is left.
pub fn non_empty_string(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Last whitespace-delimited token of a line.
pub fn last_token(line: &str) -> Option<&str> {
    line.split_whitespace().next_back()
}

/// Value of a `marker ... value` line: the last token, if the line starts with `marker`.
pub fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    if line.starts_with(marker) {
        last_token(line)
    } else {
        None
    }
}

/// Parse the integer following the last `sep` in `s` (e.g. `job.sh.o1234` -> 1234).
pub fn trailing_number(s: &str, sep: char) -> Option<u64> {
    s.rsplit_once(sep)
        .and_then(|(_, digits)| digits.trim().parse().ok())
}

/// Split a whitespace-delimited line and validate the exact field count.
pub fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != expected {
        return Err(format!(
            "Expected {} fields, got {}: {}",
            expected,
            fields.len(),
            line
        ));
    }
    Ok(fields)
}
