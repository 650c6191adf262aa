use crate::error::{ReportApiError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static REPORT_ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Report_(\d+)").unwrap());

/// Extract the numeric id from a free-text report name such as `Report_1366_latest`.
///
/// The name must start with `Report_` (case-sensitive) followed by at least one
/// digit; surrounding whitespace is ignored. Anything else is a validation error.
pub fn extract_report_id(report_name: &str) -> Result<i64> {
    let trimmed = report_name.trim();
    let captures = REPORT_ID_PATTERN.captures(trimmed).ok_or_else(|| {
        ReportApiError::validation(
            "report_name",
            format!("Cannot find a report id in '{trimmed}', expected a name like Report_1366_latest"),
        )
    })?;

    captures[1].parse::<i64>().map_err(|_| {
        ReportApiError::validation(
            "report_name",
            format!("Report id in '{trimmed}' is too large"),
        )
    })
}

/// Normalise a list of report names: trim each one and drop blanks
pub fn clean_report_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}
