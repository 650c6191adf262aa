use crate::error::{ReportApiError, Result};
use crate::report_name::extract_report_id;
use crate::types::ReportMapping;
use url::Url;

/// Parameters of a report comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRequest {
    pub report_id_1: i64,
    pub report_id_2: i64,
    pub stage_id_1: Option<i64>,
    pub stage_id_2: Option<i64>,
    /// Ask the backend to store the comparison result
    pub insert_flag: bool,
}

impl ComparisonRequest {
    pub fn new(report_id_1: i64, report_id_2: i64) -> Self {
        Self {
            report_id_1,
            report_id_2,
            stage_id_1: None,
            stage_id_2: None,
            insert_flag: false,
        }
    }

    #[must_use]
    pub fn with_stages(mut self, stage_id_1: Option<i64>, stage_id_2: Option<i64>) -> Self {
        self.stage_id_1 = stage_id_1;
        self.stage_id_2 = stage_id_2;
        self
    }

    #[must_use]
    pub fn with_insert_flag(mut self, insert_flag: bool) -> Self {
        self.insert_flag = insert_flag;
        self
    }

    /// Compare the sample report named by a mapping with the report it produced
    pub fn from_mapping(mapping: &ReportMapping) -> Result<Self> {
        let source_id = extract_report_id(&mapping.original_report_name)?;
        let inserted_id = mapping.inserted_report_id.ok_or_else(|| {
            ReportApiError::validation(
                "inserted_report_id",
                format!(
                    "Mapping {} ({}) has no inserted report to compare against",
                    mapping.id, mapping.original_report_name
                ),
            )
        })?;

        Ok(Self::new(source_id, inserted_id))
    }

    /// Both report ids are required and must be positive
    pub fn validate(&self) -> Result<()> {
        if self.report_id_1 <= 0 {
            return Err(ReportApiError::validation("report_id_1", "Report ID 1 is required"));
        }
        if self.report_id_2 <= 0 {
            return Err(ReportApiError::validation("report_id_2", "Report ID 2 is required"));
        }
        Ok(())
    }

    /// Query pairs in wire order; undefined stage ids are left out
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("report_id_1", self.report_id_1.to_string()),
            ("report_id_2", self.report_id_2.to_string()),
        ];
        if let Some(stage) = self.stage_id_1 {
            pairs.push(("project_report_stage_id_1", stage.to_string()));
        }
        if let Some(stage) = self.stage_id_2 {
            pairs.push(("project_report_stage_id_2", stage.to_string()));
        }
        pairs.push(("insert_flag", self.insert_flag.to_string()));
        pairs
    }

    /// Append the query pairs to an endpoint URL
    pub fn apply_to(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        for (key, value) in self.query_pairs() {
            query.append_pair(key, &value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemStatus;

    fn endpoint() -> Url {
        Url::parse("http://127.0.0.1:5000/api/reportComparison").unwrap()
    }

    #[test]
    fn test_query_omits_missing_stages() {
        let request = ComparisonRequest::new(100, 200).with_insert_flag(false);
        let mut url = endpoint();
        request.apply_to(&mut url);

        assert_eq!(url.query(), Some("report_id_1=100&report_id_2=200&insert_flag=false"));
    }

    #[test]
    fn test_query_includes_stages_in_order() {
        let request = ComparisonRequest::new(100, 200)
            .with_stages(Some(7), Some(9))
            .with_insert_flag(true);
        let mut url = endpoint();
        request.apply_to(&mut url);

        assert_eq!(
            url.query(),
            Some("report_id_1=100&report_id_2=200&project_report_stage_id_1=7&project_report_stage_id_2=9&insert_flag=true")
        );
    }

    #[test]
    fn test_single_stage() {
        let request = ComparisonRequest::new(1, 2).with_stages(None, Some(3));
        let keys: Vec<&str> = request.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["report_id_1", "report_id_2", "project_report_stage_id_2", "insert_flag"]
        );
    }

    #[test]
    fn test_validate_requires_ids() {
        assert!(ComparisonRequest::new(100, 200).validate().is_ok());
        assert!(ComparisonRequest::new(0, 200).validate().is_err());
        assert!(ComparisonRequest::new(100, -1).validate().is_err());
    }

    fn mapping(name: &str, inserted: Option<i64>) -> ReportMapping {
        ReportMapping {
            id: 3,
            original_report_name: name.to_string(),
            inserted_report_id: inserted,
            status: ItemStatus::Success,
            error_message: None,
            created_at: None,
        }
    }

    #[test]
    fn test_from_mapping() {
        let request = ComparisonRequest::from_mapping(&mapping("Report_1366_latest", Some(8812))).unwrap();
        assert_eq!(request.report_id_1, 1366);
        assert_eq!(request.report_id_2, 8812);
        assert!(!request.insert_flag);
    }

    #[test]
    fn test_from_mapping_requires_inserted_id() {
        let err = ComparisonRequest::from_mapping(&mapping("Report_1366_latest", None)).unwrap_err();
        assert!(matches!(err, ReportApiError::Validation { ref field, .. } if field == "inserted_report_id"));
    }

    #[test]
    fn test_from_mapping_rejects_unparseable_name() {
        let err = ComparisonRequest::from_mapping(&mapping("quarterly upload", Some(10))).unwrap_err();
        assert!(matches!(err, ReportApiError::Validation { ref field, .. } if field == "report_name"));
    }
}
