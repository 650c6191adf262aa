use crate::error::Result;
use crate::types::BulkStatus;
use std::future::Future;

/// Anything that can answer a bulk-status query for a batch id
pub trait BulkStatusSource: Send + Sync {
    /// Fetch the current status of `batch_id`; one network read per call
    fn bulk_status(&self, batch_id: &str) -> impl Future<Output = Result<BulkStatus>> + Send;
}

/// Callback invoked once per poll attempt
pub type PollCallback = Box<dyn Fn(&crate::poller::PollEvent) + Send + Sync>;
