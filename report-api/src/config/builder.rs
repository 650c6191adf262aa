use crate::config::types::{ApiConfig, AutomationConfig, DisplayConfig, MdfiveConfig, PollingConfig};
use crate::error::Result;
use std::collections::HashMap;

/// Builder for MdfiveConfig to improve API ergonomics
pub struct MdfiveConfigBuilder {
    api: ApiConfig,
    polling: PollingConfig,
    automation: AutomationConfig,
    display: DisplayConfig,
}

impl MdfiveConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            api: ApiConfig::default(),
            polling: PollingConfig::default(),
            automation: AutomationConfig::default(),
            display: DisplayConfig::default(),
        }
    }

    /// Set the backend base URL
    #[must_use]
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.api.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.api.timeout_seconds = Some(seconds);
        self
    }

    /// Add headers sent with every request
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.api.headers = Some(headers);
        self
    }

    /// Set the polling schedule
    pub fn polling(mut self, initial_delay_seconds: u64, interval_seconds: u64, max_attempts: u32) -> Self {
        self.polling = PollingConfig {
            initial_delay_seconds: Some(initial_delay_seconds),
            interval_seconds: Some(interval_seconds),
            max_attempts: Some(max_attempts),
        };
        self
    }

    /// Set the automation target site
    pub fn automation_url<S: Into<String>>(mut self, url: S) -> Self {
        self.automation.target_url = Some(url.into());
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.automation.headless = Some(headless);
        self
    }

    pub fn automation_timeout(mut self, seconds: u64) -> Self {
        self.automation.timeout_seconds = Some(seconds);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.display.page_size = Some(page_size);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MdfiveConfig> {
        let config = MdfiveConfig {
            api: self.api,
            polling: self.polling,
            automation: self.automation,
            display: self.display,
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for MdfiveConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
