use crate::error::{ReportApiError, Result};
use crate::traits::BulkStatusSource;
use crate::types::BulkStatus;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Step {
    Status(BulkStatus),
    Error(String),
}

impl Step {
    fn into_result(self) -> Result<BulkStatus> {
        match self {
            Step::Status(status) => Ok(status),
            Step::Error(message) => Err(ReportApiError::api(message)),
        }
    }
}

/// Status source that replays a scripted sequence of answers and records
/// when each query arrived
#[derive(Debug, Default)]
pub struct MockStatusSource {
    script: Mutex<VecDeque<Step>>,
    fallback: Option<Step>,
    queries: Mutex<Vec<(String, Instant)>>,
}

impl MockStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_status(self, status: BulkStatus) -> Self {
        self.push(Step::Status(status))
    }

    pub fn then_error<S: Into<String>>(self, message: S) -> Self {
        self.push(Step::Error(message.into()))
    }

    /// Answer with `status` once the script runs out
    pub fn repeating(mut self, status: BulkStatus) -> Self {
        self.fallback = Some(Step::Status(status));
        self
    }

    /// Fail every query once the script runs out
    pub fn repeating_error<S: Into<String>>(mut self, message: S) -> Self {
        self.fallback = Some(Step::Error(message.into()));
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn query_times(&self) -> Vec<Instant> {
        self.queries
            .lock()
            .map(|q| q.iter().map(|(_, at)| *at).collect())
            .unwrap_or_default()
    }

    pub fn queried_ids(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    fn push(self, step: Step) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
        self
    }

    fn next_step(&self) -> Option<Step> {
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        scripted.or_else(|| self.fallback.clone())
    }
}

impl BulkStatusSource for MockStatusSource {
    async fn bulk_status(&self, batch_id: &str) -> Result<BulkStatus> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((batch_id.to_string(), Instant::now()));
        }
        self.next_step()
            .map(Step::into_result)
            .unwrap_or_else(|| Err(ReportApiError::api("no scripted bulk status left")))
    }
}

/// Small builders shared by unit and integration tests
pub mod test_helpers {
    use crate::types::{BatchState, BulkResult, BulkStatus, ItemStatus};

    pub fn processing_status(total: usize, processed: usize) -> BulkStatus {
        BulkStatus {
            status: BatchState::Processing,
            total: Some(total),
            processed: Some(processed),
            results: vec![],
        }
    }

    pub fn completed_status(results: Vec<BulkResult>) -> BulkStatus {
        let total = results.len();
        BulkStatus {
            status: BatchState::Completed,
            total: Some(total),
            processed: Some(total),
            results,
        }
    }

    pub fn success_result(report_name: &str, report_id: i64) -> BulkResult {
        BulkResult {
            report_name: report_name.to_string(),
            status: ItemStatus::Success,
            report_id: Some(report_id),
            error: None,
        }
    }

    pub fn failed_result(report_name: &str, error: &str) -> BulkResult {
        BulkResult {
            report_name: report_name.to_string(),
            status: ItemStatus::Failed,
            report_id: None,
            error: Some(error.to_string()),
        }
    }
}
