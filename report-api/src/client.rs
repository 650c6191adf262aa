use crate::automation::{AutomationKind, AutomationOutcome, ForgotRequest, SignInRequest, SignUpRequest};
use crate::comparison::ComparisonRequest;
use crate::config::MdfiveConfig;
use crate::download::{
    default_bulk_file_name, default_report_file_name, ensure_content_type, error_message_from_body,
    file_name_from_disposition, BulkDownloadRequest, DownloadRequest, DownloadedFile,
    PDF_CONTENT_TYPE, ZIP_CONTENT_TYPE,
};
use crate::error::{ReportApiError, Result};
use crate::report_name::clean_report_names;
use crate::traits::BulkStatusSource;
use crate::types::{
    ApiEnvelope, BulkStatus, BulkSubmission, ComparisonResponse, HealthStatus, LoadTestDataSummary,
    ProcessAllSummary, ProcessedReport, Report, ReportCombination, ReportGroup, ReportMapping,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

/// Backend ceiling on report names per bulk batch
pub const MAX_BULK_REPORTS: usize = 50;

/// Preconfigured HTTP client shared by every command.
///
/// Holds only configuration, so cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct ReportClient {
    client: Client,
    base_url: Url,
    automation_timeout: Duration,
}

impl ReportClient {
    /// Create a new client from configuration
    pub fn new(config: &MdfiveConfig) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url())?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (key, value) in config.headers() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ReportApiError::invalid_config(format!("Invalid header name: {key}")))?;
            let value = HeaderValue::from_str(&value).map_err(|_| {
                ReportApiError::invalid_config(format!("Invalid value for header {key}"))
            })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            automation_timeout: config.automation_timeout(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.request(Method::GET, url).send().await?;
        let body = read_json_body(response).await?;
        take_data(body)
    }

    async fn post_data<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let mut builder = self.request(Method::POST, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let body = read_json_body(response).await?;
        take_data(body)
    }

    /// `GET api/health`
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("api/health")?;
        let response = self.request(Method::GET, url).send().await?;
        let body = read_json_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `GET api/test`: test-data groups keyed by sample report id
    pub async fn valid_reports(&self) -> Result<Vec<ReportGroup>> {
        self.get_data("api/test").await
    }

    /// `POST api/load-test-data`
    pub async fn load_test_data(&self) -> Result<LoadTestDataSummary> {
        self.post_data::<Value, _>("api/load-test-data", None).await
    }

    /// `GET api/reportSummary`
    pub async fn report_summary(&self) -> Result<Vec<ReportCombination>> {
        self.get_data("api/reportSummary").await
    }

    /// `GET api/reportComparison`
    pub async fn compare_reports(&self, request: &ComparisonRequest) -> Result<ComparisonResponse> {
        request.validate()?;
        let mut url = self.endpoint("api/reportComparison")?;
        request.apply_to(&mut url);

        let response = self.request(Method::GET, url).send().await?;
        let body = read_json_body(response).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `GET api/reports`
    pub async fn reports(&self) -> Result<Vec<Report>> {
        self.get_data("api/reports").await
    }

    /// `GET api/report-mappings`
    pub async fn report_mappings(&self) -> Result<Vec<ReportMapping>> {
        self.get_data("api/report-mappings").await
    }

    /// `POST api/process-single-report`
    pub async fn process_single_report(&self, report_name: &str) -> Result<ProcessedReport> {
        let report_name = report_name.trim();
        if report_name.is_empty() {
            return Err(ReportApiError::validation("report_name", "Report name is required"));
        }
        self.post_data(
            "api/process-single-report",
            Some(&json!({ "report_name": report_name })),
        )
        .await
    }

    /// `POST api/process-bulk-reports`; names are trimmed and blanks dropped first
    pub async fn process_bulk_reports<S: AsRef<str>>(&self, report_names: &[S]) -> Result<BulkSubmission> {
        let names = clean_report_names(report_names);
        if names.is_empty() {
            return Err(ReportApiError::validation(
                "report_names",
                "Enter at least one report name",
            ));
        }
        if names.len() > MAX_BULK_REPORTS {
            return Err(ReportApiError::validation(
                "report_names",
                format!("Maximum {MAX_BULK_REPORTS} reports allowed per batch"),
            ));
        }
        self.post_data(
            "api/process-bulk-reports",
            Some(&json!({ "report_names": names })),
        )
        .await
    }

    /// `POST api/process-all-reports`
    pub async fn process_all_reports(&self) -> Result<ProcessAllSummary> {
        self.post_data::<Value, _>("api/process-all-reports", None).await
    }

    /// `GET api/bulk-status/{batch_id}`
    pub async fn bulk_status(&self, batch_id: &str) -> Result<BulkStatus> {
        let path = format!("api/bulk-status/{}", urlencoding::encode(batch_id));
        self.get_data(&path).await
    }

    /// `POST api/download-report`; only a PDF body is accepted
    pub async fn download_report(&self, request: &DownloadRequest) -> Result<DownloadedFile> {
        request.validate()?;
        let url = self.endpoint("api/download-report")?;
        let response = self.request(Method::POST, url).json(request).send().await?;
        read_binary(response, PDF_CONTENT_TYPE, || default_report_file_name(request.report_id)).await
    }

    /// `POST api/download-bulk-reports`; only a ZIP body is accepted
    pub async fn download_bulk_reports(&self, request: &BulkDownloadRequest) -> Result<DownloadedFile> {
        request.validate()?;
        let url = self.endpoint("api/download-bulk-reports")?;
        let response = self.request(Method::POST, url).json(request).send().await?;
        read_binary(response, ZIP_CONTENT_TYPE, || {
            default_bulk_file_name(chrono::Utc::now().timestamp())
        })
        .await
    }

    /// `POST api/automation/signin`
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<AutomationOutcome> {
        request.validate()?;
        self.automation(AutomationKind::SignIn, request).await
    }

    /// `POST api/automation/signup`
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<AutomationOutcome> {
        request.validate()?;
        self.automation(AutomationKind::SignUp, request).await
    }

    /// `POST api/automation/forgot`
    pub async fn forgot_password(&self, request: &ForgotRequest) -> Result<AutomationOutcome> {
        request.validate()?;
        self.automation(AutomationKind::Forgot, request).await
    }

    /// Automation endpoints answer failures with the same JSON shape as
    /// successes, so the body is parsed whatever the status code.
    async fn automation<B: Serialize>(&self, kind: AutomationKind, body: &B) -> Result<AutomationOutcome> {
        let url = self.endpoint(kind.path())?;
        let response = self
            .request(Method::POST, url)
            .timeout(self.automation_timeout)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<AutomationOutcome>(&bytes) {
            Ok(mut outcome) => {
                if !status.is_success() {
                    outcome.success = false;
                }
                Ok(outcome)
            }
            Err(_) if !status.is_success() => Err(ReportApiError::Status {
                status: status.as_u16(),
                message: error_message_from_body(&bytes),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

impl BulkStatusSource for ReportClient {
    async fn bulk_status(&self, batch_id: &str) -> Result<BulkStatus> {
        ReportClient::bulk_status(self, batch_id).await
    }
}

/// Read a JSON body, turning non-2xx codes and `status: "error"` envelopes into errors
async fn read_json_body(response: Response) -> Result<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(ReportApiError::Status {
            status: status.as_u16(),
            message: error_message_from_body(&bytes),
        });
    }

    let body: Value = serde_json::from_slice(&bytes)?;
    let envelope: ApiEnvelope<Value> = serde_json::from_value(body.clone())?;
    if envelope.is_error() {
        return Err(ReportApiError::api(
            envelope
                .message
                .unwrap_or_else(|| "The backend reported an error".to_string()),
        ));
    }

    Ok(body)
}

/// Deserialize the `data` member of an envelope
fn take_data<T: DeserializeOwned>(mut body: Value) -> Result<T> {
    let data = body
        .get_mut("data")
        .map(Value::take)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ReportApiError::api("The backend response did not include any data"))?;
    Ok(serde_json::from_value(data)?)
}

/// Read a binary download after checking status and content type
async fn read_binary<F>(response: Response, expected: &str, fallback_name: F) -> Result<DownloadedFile>
where
    F: FnOnce() -> String,
{
    let status = response.status();
    let content_type = header_text(&response, CONTENT_TYPE);
    let disposition = header_text(&response, CONTENT_DISPOSITION);
    let bytes = response.bytes().await?;

    if !status.is_success() {
        return Err(ReportApiError::Status {
            status: status.as_u16(),
            message: error_message_from_body(&bytes),
        });
    }

    ensure_content_type(expected, content_type.as_deref(), &bytes)?;

    let file_name = disposition
        .as_deref()
        .and_then(file_name_from_disposition)
        .unwrap_or_else(fallback_name);

    Ok(DownloadedFile {
        file_name,
        content_type: expected.to_string(),
        bytes: bytes.to_vec(),
    })
}

fn header_text(response: &Response, name: HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MdfiveConfigBuilder;
    use std::collections::HashMap;

    fn client_for(base_url: &str) -> ReportClient {
        let config = MdfiveConfigBuilder::new().base_url(base_url).build().unwrap();
        ReportClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_relative_paths() {
        let client = client_for("http://127.0.0.1:5000");
        assert_eq!(
            client.endpoint("api/reports").unwrap().as_str(),
            "http://127.0.0.1:5000/api/reports"
        );
        assert_eq!(
            client.endpoint("/api/reports").unwrap().as_str(),
            "http://127.0.0.1:5000/api/reports"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client_for("http://gateway.local/md5");
        assert_eq!(
            client.endpoint("api/test").unwrap().as_str(),
            "http://gateway.local/md5/api/test"
        );
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let mut headers = HashMap::new();
        headers.insert("Bad Header".to_string(), "value".to_string());
        let config = MdfiveConfigBuilder::new().headers(headers).build().unwrap();

        assert!(matches!(
            ReportClient::new(&config),
            Err(ReportApiError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_take_data() {
        let reports: Vec<ReportGroup> = take_data(json!({
            "status": "success",
            "data": [{ "sample_report_id": "12", "report_count": 3 }]
        }))
        .unwrap();
        assert_eq!(reports.len(), 1);

        let missing = take_data::<Vec<ReportGroup>>(json!({ "status": "success" }));
        assert!(matches!(missing, Err(ReportApiError::Api { .. })));
    }

    #[tokio::test]
    async fn test_blank_report_name_is_rejected_before_sending() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.process_single_report("   ").await.unwrap_err();
        assert!(matches!(err, ReportApiError::Validation { .. }));

        let names: Vec<String> = vec![" ".to_string(), String::new()];
        let err = client.process_bulk_reports(&names).await.unwrap_err();
        assert!(matches!(err, ReportApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_before_sending() {
        let client = client_for("http://127.0.0.1:9");
        let names: Vec<String> = (1..=51).map(|i| format!("Report_{i}")).collect();
        let err = client.process_bulk_reports(&names).await.unwrap_err();
        assert!(err.to_string().contains("Maximum 50"));
    }
}
