use crate::error::Result;
use std::fs;
use std::path::Path;

/// Generate the default mdfive.toml template with every setting documented
pub fn generate_default_config_template() -> String {
    r#"# mdfive configuration
# Every value is optional; the values below are the built-in defaults.

[api]
# Backend base URL (MDFIVE_API_BASE_URL overrides this value)
base_url = "http://127.0.0.1:5000/"
# Request timeout in seconds
timeout_seconds = 10

# Extra headers sent with every request
# [api.headers]
# "X-Client" = "mdfive"

[polling]
# Delay before the first bulk-status query
initial_delay_seconds = 2
# Fixed delay between queries
interval_seconds = 5
# Maximum number of status queries per batch
max_attempts = 60

[automation]
# Site the backend automation drives
target_url = "https://qa.systemisers.in/"
# Run the browser without a visible window
headless = true
# Automation runs can take over a minute
timeout_seconds = 90

[display]
# Rows per page for report and mapping tables
page_size = 10
"#
    .to_string()
}

/// Sample sheet for bulk sign-in automation
pub fn generate_signin_sheet() -> String {
    r"Email,Password,Name,Description
user1@example.com,password123,Test User 1,Primary test account
user2@example.com,password456,Test User 2,Secondary test account
"
    .to_string()
}

/// Sample sheet for bulk sign-up automation
pub fn generate_signup_sheet() -> String {
    r"FirstName,LastName,Email,Mobile,Password,ConfirmPassword
Asha,Rao,asha.rao@example.com,9876543210,Testing@12345,Testing@12345
Vikram,Iyer,vikram.iyer@example.com,9123456780,Testing@12345,
"
    .to_string()
}

/// Sample sheet for bulk forgot-password automation
pub fn generate_forgot_sheet() -> String {
    r"Email
user1@example.com
user2@example.com
"
    .to_string()
}

/// Write the default configuration file unless it already exists.
///
/// Returns whether a file was written.
pub fn ensure_config_file_exists<P: AsRef<Path>>(config_path: P, force: bool) -> Result<bool> {
    let config_path = config_path.as_ref();
    if config_path.exists() && !force {
        return Ok(false);
    }

    fs::write(config_path, generate_default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MdfiveConfig;
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_to_defaults() {
        let config: MdfiveConfig = toml::from_str(&generate_default_config_template()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), crate::config::DEFAULT_BASE_URL);
        assert_eq!(config.polling.max_attempts, Some(60));
        assert_eq!(config.page_size(), 10);
    }

    #[test]
    fn test_ensure_config_file_exists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mdfive.toml");

        assert!(ensure_config_file_exists(&path, false).unwrap());
        assert!(!ensure_config_file_exists(&path, false).unwrap());
        assert!(ensure_config_file_exists(&path, true).unwrap());
    }

    #[test]
    fn test_sheet_templates_have_headers() {
        assert!(generate_signin_sheet().starts_with("Email,Password"));
        assert!(generate_signup_sheet().starts_with("FirstName,LastName"));
        assert!(generate_forgot_sheet().starts_with("Email"));
    }
}
