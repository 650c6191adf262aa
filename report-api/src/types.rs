use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON envelope every backend endpoint answers with
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// `success` or `error`
    #[serde(default)]
    pub status: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Processed report as listed by `api/reports`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Report {
    pub id: i64,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub loan_scheme_name: Option<String>,
    #[serde(default)]
    pub is_fresh_term_loan: Option<bool>,
    #[serde(default)]
    pub is_od_enhancement: Option<bool>,
    #[serde(default)]
    pub is_takeover: Option<bool>,
    #[serde(default)]
    pub is_od_renewal: Option<bool>,
    #[serde(default)]
    pub is_od_fresh: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Report {
    /// Human readable list of the loan/scheme flags that are set
    pub fn scheme_summary(&self) -> String {
        let flags = [
            (self.is_fresh_term_loan, "Fresh Term Loan"),
            (self.is_od_enhancement, "OD Enhancement"),
            (self.is_takeover, "Takeover"),
            (self.is_od_renewal, "OD Renewal"),
            (self.is_od_fresh, "Fresh OD"),
        ];
        let set: Vec<&str> = flags
            .iter()
            .filter(|(flag, _)| flag.unwrap_or(false))
            .map(|(_, label)| *label)
            .collect();

        if set.is_empty() {
            "-".to_string()
        } else {
            set.join(" + ")
        }
    }
}

/// Group of test-data rows sharing a sample report id (`api/test`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportGroup {
    #[serde(deserialize_with = "string_or_number")]
    pub sample_report_id: String,
    pub report_count: i64,
}

/// One slice of the dashboard summary (`api/reportSummary`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportCombination {
    pub report_combination: String,
    pub report_count: i64,
}

/// Processing status recorded for a mapping or a bulk item
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Processing,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ItemStatus::Processing => "processing",
            ItemStatus::Success => "success",
            ItemStatus::Failed => "failed",
            ItemStatus::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Audit record linking an original report name to the id it produced
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportMapping {
    pub id: i64,
    pub original_report_name: String,
    #[serde(default)]
    pub inserted_report_id: Option<i64>,
    pub status: ItemStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Per-item result of a bulk batch
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BulkResult {
    pub report_name: String,
    pub status: ItemStatus,
    #[serde(default)]
    pub report_id: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Lifecycle state of a bulk batch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Processing,
    Completed,
    #[serde(other)]
    Unknown,
}

/// Body of `api/bulk-status/{batch_id}`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BulkStatus {
    pub status: BatchState,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub processed: Option<usize>,
    #[serde(default)]
    pub results: Vec<BulkResult>,
}

impl BulkStatus {
    pub fn is_processing(&self) -> bool {
        self.status == BatchState::Processing
    }

    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == ItemStatus::Success)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == ItemStatus::Failed)
            .count()
    }
}

/// Acknowledgement of `api/process-bulk-reports`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BulkSubmission {
    pub batch_id: String,
    #[serde(default)]
    pub total_reports: Option<usize>,
    #[serde(default)]
    pub report_names: Vec<String>,
}

/// Result of `api/process-single-report`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProcessedReport {
    #[serde(default)]
    pub report_name: Option<String>,
    pub report_id: i64,
}

/// Result of `api/load-test-data`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LoadTestDataSummary {
    #[serde(default)]
    pub processed_count: usize,
    #[serde(default)]
    pub failed_count: usize,
    #[serde(default)]
    pub processed_reports: Vec<BulkResult>,
    #[serde(default)]
    pub failed_reports: Vec<FailedReport>,
}

/// Report the backend could not process
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FailedReport {
    pub report_name: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of `api/process-all-reports`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProcessAllSummary {
    #[serde(default)]
    pub processed: Vec<ProcessedReport>,
    #[serde(default)]
    pub failed: Vec<FailedReport>,
}

/// One field-level discrepancy between two reports
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiffEntry {
    #[serde(alias = "path")]
    pub diff_key_path: String,
    #[serde(default)]
    pub value_1: Value,
    #[serde(default)]
    pub value_2: Value,
}

impl DiffEntry {
    pub fn display_value_1(&self) -> String {
        display_value(&self.value_1)
    }

    pub fn display_value_2(&self) -> String {
        display_value(&self.value_2)
    }
}

/// Body of `api/reportComparison`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ComparisonResponse {
    #[serde(default)]
    pub data: Vec<DiffEntry>,
    #[serde(default)]
    pub comparison_info: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `api/health`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Render a JSON value for a table cell: strings without quotes, null as empty
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bulk_status_defaults_results() {
        let status: BulkStatus = serde_json::from_value(json!({ "status": "processing" })).unwrap();
        assert!(status.is_processing());
        assert!(status.results.is_empty());
    }

    #[test]
    fn test_bulk_status_counts() {
        let status: BulkStatus = serde_json::from_value(json!({
            "status": "completed",
            "total": 3,
            "processed": 3,
            "results": [
                { "report_name": "Report_1_a", "status": "success", "report_id": 501 },
                { "report_name": "Report_2_a", "status": "failed", "error": "No data found" },
                { "report_name": "Report_3_a", "status": "success", "report_id": 502 }
            ]
        }))
        .unwrap();

        assert_eq!(status.status, BatchState::Completed);
        assert_eq!(status.succeeded(), 2);
        assert_eq!(status.failed(), 1);
        assert_eq!(status.results[1].error.as_deref(), Some("No data found"));
    }

    #[test]
    fn test_unknown_states_are_preserved() {
        let status: BulkStatus = serde_json::from_value(json!({ "status": "cancelled" })).unwrap();
        assert_eq!(status.status, BatchState::Unknown);

        let mapping: ReportMapping = serde_json::from_value(json!({
            "id": 1,
            "original_report_name": "Report_12_v2",
            "inserted_report_id": null,
            "status": "queued"
        }))
        .unwrap();
        assert_eq!(mapping.status, ItemStatus::Unknown);
        assert_eq!(mapping.inserted_report_id, None);
    }

    #[test]
    fn test_report_group_accepts_numeric_id() {
        let group: ReportGroup =
            serde_json::from_value(json!({ "sample_report_id": 1366, "report_count": 4 })).unwrap();
        assert_eq!(group.sample_report_id, "1366");

        let group: ReportGroup =
            serde_json::from_value(json!({ "sample_report_id": "1367", "report_count": 1 })).unwrap();
        assert_eq!(group.sample_report_id, "1367");
    }

    #[test]
    fn test_scheme_summary() {
        let report: Report = serde_json::from_value(json!({
            "id": 10,
            "bank_name": "State Bank",
            "is_fresh_term_loan": true,
            "is_od_enhancement": false,
            "is_takeover": true
        }))
        .unwrap();
        assert_eq!(report.scheme_summary(), "Fresh Term Loan + Takeover");

        let bare: Report = serde_json::from_value(json!({ "id": 11 })).unwrap();
        assert_eq!(bare.scheme_summary(), "-");
    }

    #[test]
    fn test_diff_entry_display_values() {
        let entry: DiffEntry = serde_json::from_value(json!({
            "diff_key_path": "financials.years[2].revenue",
            "value_1": 1200.5,
            "value_2": null
        }))
        .unwrap();

        assert_eq!(entry.display_value_1(), "1200.5");
        assert_eq!(entry.display_value_2(), "");
    }

    #[test]
    fn test_envelope_error_flag() {
        let envelope: ApiEnvelope<Vec<Report>> = serde_json::from_value(json!({
            "status": "error",
            "message": "relation does not exist",
            "data": []
        }))
        .unwrap();
        assert!(envelope.is_error());
        assert_eq!(envelope.message.as_deref(), Some("relation does not exist"));
    }
}
