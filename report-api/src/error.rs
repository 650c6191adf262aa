use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report-api operations
pub type Result<T> = std::result::Result<T, ReportApiError>;

/// Error types for every call made against the report backend
#[derive(Debug, Error)]
pub enum ReportApiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Response decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Backend reported an error: {message}")]
    Api { message: String },

    #[error("Expected {expected} but received {actual}: {message}")]
    UnexpectedContentType {
        expected: String,
        actual: String,
        message: String,
    },

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Batch '{batch_id}' is already being polled")]
    PollInProgress { batch_id: String },
}

impl ReportApiError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a new client-side validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new application-level error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Whether the request failed because the client timeout elapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_timeout())
    }

    /// Whether the request never reached the backend
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_connect())
    }

    /// Short, human readable description used in alert lines
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(err) if err.is_timeout() => {
                "The backend did not answer before the request timeout".to_string()
            }
            Self::Http(err) if err.is_connect() => {
                format!("Could not connect to the backend: {err}")
            }
            Self::Status { status, message } => format!("Request failed ({status}): {message}"),
            Self::Api { message } => message.clone(),
            Self::UnexpectedContentType { message, .. } => format!("Download failed: {message}"),
            Self::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ReportApiError::validation("report_name", "Report name is required");
        assert_eq!(err.to_string(), "Invalid report_name: Report name is required");
        assert_eq!(err.user_message(), "Report name is required");
    }

    #[test]
    fn test_content_type_message() {
        let err = ReportApiError::UnexpectedContentType {
            expected: "application/pdf".to_string(),
            actual: "application/json".to_string(),
            message: "Failed to download report 7".to_string(),
        };
        assert!(err.to_string().contains("application/pdf"));
        assert_eq!(err.user_message(), "Download failed: Failed to download report 7");
        assert!(!err.is_timeout());
    }
}
