use crate::error::{ReportApiError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Backend ceiling on report ids per bulk download
pub const MAX_BULK_DOWNLOAD: usize = 50;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// Body of `api/download-report`
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub report_id: i64,
    pub email: String,
    pub password: String,
}

/// Body of `api/download-bulk-reports`
#[derive(Debug, Clone, Serialize)]
pub struct BulkDownloadRequest {
    pub report_ids: Vec<i64>,
    pub email: String,
    pub password: String,
}

impl DownloadRequest {
    pub fn validate(&self) -> Result<()> {
        if self.report_id <= 0 {
            return Err(ReportApiError::validation("report_id", "Report ID is required"));
        }
        validate_credentials(&self.email, &self.password)
    }
}

impl BulkDownloadRequest {
    pub fn validate(&self) -> Result<()> {
        if self.report_ids.is_empty() {
            return Err(ReportApiError::validation(
                "report_ids",
                "Select at least one report to download",
            ));
        }
        if self.report_ids.len() > MAX_BULK_DOWNLOAD {
            return Err(ReportApiError::validation(
                "report_ids",
                format!("Maximum {MAX_BULK_DOWNLOAD} reports allowed for bulk download"),
            ));
        }
        if let Some(bad) = self.report_ids.iter().find(|id| **id <= 0) {
            return Err(ReportApiError::validation(
                "report_ids",
                format!("Invalid report id: {bad}"),
            ));
        }
        validate_credentials(&self.email, &self.password)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ReportApiError::validation(
            "credentials",
            "Email and password are required",
        ));
    }
    Ok(())
}

/// A binary file received from the backend, not yet written anywhere
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DownloadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the file into `dir`, creating the directory when needed
    pub fn save_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Media type of a Content-Type header, without parameters, lowercased
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Reject responses whose media type is not the expected binary format.
///
/// The backend answers failed downloads with a JSON body, sometimes with a 200
/// status, so the body is mined for a message before giving up.
pub fn ensure_content_type(expected: &str, content_type: Option<&str>, body: &[u8]) -> Result<()> {
    let actual = content_type.map(media_type).unwrap_or_default();
    if actual == expected {
        return Ok(());
    }

    Err(ReportApiError::UnexpectedContentType {
        expected: expected.to_string(),
        actual: if actual.is_empty() {
            "no content type".to_string()
        } else {
            actual
        },
        message: error_message_from_body(body),
    })
}

/// Best-effort extraction of `message`/`error` from a JSON error body
pub fn error_message_from_body(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "the backend returned an empty response".to_string()
    } else {
        text.chars().take(200).collect()
    }
}

/// File name from a `Content-Disposition` header, if it carries a usable one
pub fn file_name_from_disposition(header: &str) -> Option<String> {
    let name = header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("filename") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })?;

    // Never let a header choose a directory
    let name = Path::new(&name).file_name()?.to_str()?.to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn default_report_file_name(report_id: i64) -> String {
    format!("Report_{report_id}.pdf")
}

pub fn default_bulk_file_name(timestamp: i64) -> String {
    format!("BulkReports_{timestamp}.zip")
}

/// Tracks the single download allowed to run at a time within one
/// long-lived view. The CLI runs one download per process and does not need it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadState {
    downloading_id: Option<i64>,
}

impl DownloadState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloading_id(&self) -> Option<i64> {
        self.downloading_id
    }

    pub fn is_busy(&self) -> bool {
        self.downloading_id.is_some()
    }

    /// Mark `report_id` as downloading; refused while another download runs
    pub fn begin(&mut self, report_id: i64) -> Result<()> {
        if let Some(current) = self.downloading_id {
            return Err(ReportApiError::validation(
                "report_id",
                format!("Report {current} is still downloading"),
            ));
        }
        self.downloading_id = Some(report_id);
        Ok(())
    }

    /// Clear the in-flight marker, on success and on error alike
    pub fn finish(&mut self) {
        self.downloading_id = None;
    }
}
