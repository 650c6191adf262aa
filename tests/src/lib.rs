#[cfg(test)]
mod tests {
    use report_api::automation::{sign_in_batch, sign_up_batch};
    use report_api::config::{
        ensure_config_file_exists, generate_signin_sheet, generate_signup_sheet, load_sheet_rows,
        DEFAULT_AUTOMATION_URL,
    };
    use report_api::{MdfiveConfig, PollSchedule, ReportClient};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_drives_client_and_poller() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mdfive.toml");
        assert!(ensure_config_file_exists(&path, false).unwrap());

        let config = MdfiveConfig::load_from_file(&path).unwrap();
        let client = ReportClient::new(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:5000/");

        let schedule = PollSchedule::from_config(&config);
        assert_eq!(schedule.initial_delay, Duration::from_secs(2));
        assert_eq!(schedule.interval, Duration::from_secs(5));
        assert_eq!(schedule.max_attempts, 60);
    }

    #[test]
    fn test_edited_config_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mdfive.toml");
        fs::write(
            &path,
            r#"[api]
base_url = "http://reports.internal:8080/md5"

[polling]
interval_seconds = 1
max_attempts = 3

[automation]
headless = false
"#,
        )
        .unwrap();

        let config = MdfiveConfig::load_from_file(&path).unwrap();
        let client = ReportClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("api/reports").unwrap().as_str(),
            "http://reports.internal:8080/md5/api/reports"
        );
        assert!(!config.headless());

        let schedule = PollSchedule::from_config(&config);
        assert_eq!(schedule.initial_delay, Duration::from_secs(2));
        assert_eq!(schedule.max_attempts, 3);
    }

    #[test]
    fn test_invalid_config_is_rejected_by_client() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mdfive.toml");
        fs::write(&path, "[display]\npage_size = 0\n").unwrap();

        let config = MdfiveConfig::load_from_file(&path).unwrap();
        assert!(ReportClient::new(&config).is_err());
    }

    #[test]
    fn test_sheet_templates_feed_bulk_automation() {
        let temp_dir = TempDir::new().unwrap();

        let signin = temp_dir.path().join("signin.csv");
        fs::write(&signin, generate_signin_sheet()).unwrap();
        let rows = load_sheet_rows(&signin).unwrap();
        let batch = sign_in_batch(&rows, DEFAULT_AUTOMATION_URL, true);
        assert_eq!(batch.requests.len(), 2);
        assert!(batch.skipped_rows.is_empty());
        assert_eq!(batch.requests[1].email, "user2@example.com");

        let signup = temp_dir.path().join("signup.csv");
        fs::write(&signup, generate_signup_sheet()).unwrap();
        let rows = load_sheet_rows(&signup).unwrap();
        let batch = sign_up_batch(&rows, DEFAULT_AUTOMATION_URL, true);
        assert_eq!(batch.requests.len(), 2);
        // Blank ConfirmPassword falls back to Password
        assert_eq!(batch.requests[1].confirm_password, "Testing@12345");
    }
}
