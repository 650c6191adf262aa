//! Report API - typed client for the MD5 report backend
//!
//! Wraps every backend endpoint the dashboard uses (report listings, single
//! and bulk processing, comparison, downloads, browser automation) and the
//! client-side logic around them: bulk-status polling, pagination,
//! report-name parsing and credential sheets.

// Core modules
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Request/response helpers
pub mod automation;
pub mod comparison;
pub mod download;
pub mod pagination;
pub mod report_name;

// Main functionality modules
pub mod client;
pub mod poller;
pub mod renderers;
pub mod testing;

pub use automation::{
    AutomationKind, AutomationOutcome, Credential, ForgotRequest, SheetBatch, SignInRequest,
    SignUpRequest,
};
pub use client::{ReportClient, MAX_BULK_REPORTS};
pub use comparison::ComparisonRequest;
pub use config::{MdfiveConfig, MdfiveConfigBuilder};
pub use download::{BulkDownloadRequest, DownloadRequest, DownloadState, DownloadedFile};
pub use error::{ReportApiError, Result};
pub use pagination::{total_pages, Page, Pager};
pub use poller::{BulkStatusPoller, PollEvent, PollOutcome, PollSchedule};
pub use report_name::extract_report_id;
pub use traits::BulkStatusSource;
pub use types::{
    BatchState, BulkResult, BulkStatus, BulkSubmission, DiffEntry, ItemStatus, Report,
    ReportCombination, ReportGroup, ReportMapping,
};

/// Submit a bulk batch and poll it to the end with the configured schedule
pub async fn process_bulk_and_wait<S: AsRef<str>>(
    config: &MdfiveConfig,
    report_names: &[S],
) -> Result<(BulkSubmission, PollOutcome)> {
    let client = ReportClient::new(config)?;
    let submission = client.process_bulk_reports(report_names).await?;
    let poller = BulkStatusPoller::with_schedule(client, PollSchedule::from_config(config));
    let outcome = poller.poll(&submission.batch_id).await?;
    Ok((submission, outcome))
}
