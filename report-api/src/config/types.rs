use crate::error::{ReportApiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Backend used when neither the config file nor the environment names one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
/// Site the automation endpoints drive when no URL is given
pub const DEFAULT_AUTOMATION_URL: &str = "https://qa.systemisers.in/";
/// Environment variable that overrides `api.base_url`
pub const BASE_URL_ENV: &str = "MDFIVE_API_BASE_URL";

/// Main configuration structure, loaded from `mdfive.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MdfiveConfig {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Bulk-status polling schedule
    #[serde(default)]
    pub polling: PollingConfig,
    /// Defaults forwarded to the automation endpoints
    #[serde(default)]
    pub automation: AutomationConfig,
    /// Terminal rendering settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the backend, endpoints are joined onto it
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Extra headers sent with every request
    pub headers: Option<HashMap<String, String>>,
}

/// Bulk-status polling schedule
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PollingConfig {
    pub initial_delay_seconds: Option<u64>,
    pub interval_seconds: Option<u64>,
    pub max_attempts: Option<u32>,
}

/// Defaults forwarded to the automation endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AutomationConfig {
    /// Site the backend should drive
    pub target_url: Option<String>,
    /// Run the browser without a visible window
    pub headless: Option<bool>,
    /// Automation runs take much longer than plain API calls
    pub timeout_seconds: Option<u64>,
}

/// Terminal rendering settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub page_size: Option<usize>,
}

impl MdfiveConfig {
    /// Resolved backend base URL, always ending with a slash so joins keep the path
    pub fn base_url(&self) -> String {
        let raw = self
            .api
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if raw.ends_with('/') {
            raw
        } else {
            format!("{raw}/")
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.unwrap_or(10))
    }

    pub fn automation_timeout(&self) -> Duration {
        Duration::from_secs(self.automation.timeout_seconds.unwrap_or(90))
    }

    pub fn automation_url(&self) -> String {
        self.automation
            .target_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AUTOMATION_URL.to_string())
    }

    pub fn headless(&self) -> bool {
        self.automation.headless.unwrap_or(true)
    }

    pub fn page_size(&self) -> usize {
        self.display.page_size.unwrap_or(10)
    }

    pub fn headers(&self) -> HashMap<String, String> {
        self.api.headers.clone().unwrap_or_default()
    }

    /// Apply `MDFIVE_API_BASE_URL` when it is set and non-empty
    pub fn apply_env_override(&mut self) {
        if let Ok(value) = std::env::var(BASE_URL_ENV) {
            if !value.trim().is_empty() {
                self.api.base_url = Some(value.trim().to_string());
            }
        }
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url();
        let parsed = url::Url::parse(&base).map_err(|e| {
            ReportApiError::invalid_config(format!("base_url '{base}' is not a valid URL: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ReportApiError::invalid_config(format!(
                "base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.api.timeout_seconds == Some(0) {
            return Err(ReportApiError::invalid_config("api.timeout_seconds must be greater than 0"));
        }
        if self.automation.timeout_seconds == Some(0) {
            return Err(ReportApiError::invalid_config(
                "automation.timeout_seconds must be greater than 0",
            ));
        }
        if self.polling.max_attempts == Some(0) {
            return Err(ReportApiError::invalid_config("polling.max_attempts must be greater than 0"));
        }
        if self.display.page_size == Some(0) {
            return Err(ReportApiError::invalid_config("display.page_size must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MdfiveConfig::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.automation_timeout(), Duration::from_secs(90));
        assert_eq!(config.automation_url(), DEFAULT_AUTOMATION_URL);
        assert!(config.headless());
        assert_eq!(config.page_size(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let mut config = MdfiveConfig::default();
        config.api.base_url = Some("http://reports.internal:8080/backend".to_string());
        assert_eq!(config.base_url(), "http://reports.internal:8080/backend/");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = MdfiveConfig::default();
        config.api.base_url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());

        let mut config = MdfiveConfig::default();
        config.display.page_size = Some(0);
        assert!(config.validate().is_err());

        let mut config = MdfiveConfig::default();
        config.polling.max_attempts = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config: MdfiveConfig = toml::from_str(
            r#"
[api]
base_url = "http://localhost:9000"

[display]
page_size = 25
"#,
        )
        .unwrap();

        assert_eq!(config.base_url(), "http://localhost:9000/");
        assert_eq!(config.page_size(), 25);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }
}
