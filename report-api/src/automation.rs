//! Requests for the backend's browser automation endpoints and the
//! spreadsheet rows that feed them in bulk.

use crate::config::SheetRow;
use crate::error::{ReportApiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which automation flow a request drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationKind {
    SignIn,
    SignUp,
    Forgot,
}

impl AutomationKind {
    /// Endpoint path relative to the backend base URL
    pub fn path(&self) -> &'static str {
        match self {
            AutomationKind::SignIn => "api/automation/signin",
            AutomationKind::SignUp => "api/automation/signup",
            AutomationKind::Forgot => "api/automation/forgot",
        }
    }
}

impl fmt::Display for AutomationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AutomationKind::SignIn => "Sign-in",
            AutomationKind::SignUp => "Sign-up",
            AutomationKind::Forgot => "Forgot-password",
        };
        f.write_str(label)
    }
}

/// Credential held in memory for the duration of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Credential {
    /// Build from a sheet row with `Email`, `Password`, `Name`, `Description` columns
    pub fn from_row(row: &SheetRow) -> Option<Self> {
        let email = cell(row, "Email")?;
        let password = cell(row, "Password")?;
        Some(Self {
            email,
            password,
            name: cell(row, "Name"),
            description: cell(row, "Description"),
        })
    }

    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

/// Body of `api/automation/signin`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    pub url: String,
    pub headless: bool,
}

impl SignInRequest {
    pub fn from_credential(credential: &Credential, url: &str, headless: bool) -> Self {
        Self {
            email: credential.email.clone(),
            password: credential.password.clone(),
            url: url.to_string(),
            headless,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ReportApiError::validation(
                "credentials",
                "Email and password are required",
            ));
        }
        Ok(())
    }
}

/// Body of `api/automation/signup`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
    pub url: String,
    pub headless: bool,
}

impl SignUpRequest {
    /// Build from a sheet row; `ConfirmPassword` falls back to `Password`
    pub fn from_row(row: &SheetRow, url: &str, headless: bool) -> Self {
        let password = cell(row, "Password").unwrap_or_default();
        Self {
            first_name: cell(row, "FirstName").unwrap_or_default(),
            last_name: cell(row, "LastName").unwrap_or_default(),
            email: cell(row, "Email").unwrap_or_default(),
            mobile: cell(row, "Mobile").unwrap_or_default(),
            confirm_password: cell(row, "ConfirmPassword").unwrap_or_else(|| password.clone()),
            password,
            url: url.to_string(),
            headless,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("mobile", &self.mobile),
            ("password", &self.password),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ReportApiError::validation(*field, "All fields are required"));
        }
        Ok(())
    }
}

/// Body of `api/automation/forgot`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ForgotRequest {
    pub email: String,
    pub headless: bool,
}

impl ForgotRequest {
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(ReportApiError::validation("email", "Email is required"));
        }
        Ok(())
    }
}

/// Response shared by every automation endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AutomationOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AutomationOutcome {
    /// Alert text: the backend message, else the error, else a generic label.
    /// A failure carrying both ends with the last line of the error.
    pub fn summary(&self, kind: AutomationKind) -> String {
        let message = non_empty(self.message.as_deref());
        let error = non_empty(self.error.as_deref());
        match (self.success, message, error) {
            (false, Some(message), Some(error)) => match last_line(error) {
                Some(reason) if !message.contains(reason) => format!("{message}: {reason}"),
                _ => message.to_string(),
            },
            (_, Some(message), _) => message.to_string(),
            (false, None, Some(error)) => error.to_string(),
            (false, None, None) => format!("{kind} failed"),
            (true, None, _) => format!("{kind} automation completed successfully"),
        }
    }

    /// Labelled text panels worth showing in full: the run output, then the error
    pub fn panels(&self) -> Vec<(&'static str, &str)> {
        let mut panels = Vec::new();
        if let Some(output) = non_empty(self.output.as_deref()) {
            panels.push(("Output", output));
        }
        if let Some(error) = non_empty(self.error.as_deref()) {
            panels.push(("Error", error));
        }
        panels
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

/// Rows of a bulk sheet turned into requests, plus the rows that had to be skipped
#[derive(Debug, Clone, PartialEq)]
pub struct SheetBatch<T> {
    pub requests: Vec<T>,
    /// 1-based data row numbers (header excluded) that lacked required columns
    pub skipped_rows: Vec<usize>,
}

pub fn sign_in_batch(rows: &[SheetRow], url: &str, headless: bool) -> SheetBatch<SignInRequest> {
    collect_batch(rows, |row| {
        Credential::from_row(row).map(|c| SignInRequest::from_credential(&c, url, headless))
    })
}

pub fn sign_up_batch(rows: &[SheetRow], url: &str, headless: bool) -> SheetBatch<SignUpRequest> {
    collect_batch(rows, |row| {
        let request = SignUpRequest::from_row(row, url, headless);
        request.validate().ok().map(|_| request)
    })
}

pub fn forgot_batch(rows: &[SheetRow], headless: bool) -> SheetBatch<ForgotRequest> {
    collect_batch(rows, |row| {
        cell(row, "Email").map(|email| ForgotRequest { email, headless })
    })
}

fn collect_batch<T, F>(rows: &[SheetRow], build: F) -> SheetBatch<T>
where
    F: Fn(&SheetRow) -> Option<T>,
{
    let mut requests = Vec::new();
    let mut skipped_rows = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match build(row) {
            Some(request) => requests.push(request),
            None => skipped_rows.push(index + 1),
        }
    }
    SheetBatch {
        requests,
        skipped_rows,
    }
}

/// Non-empty trimmed value of a column
fn cell(row: &SheetRow, column: &str) -> Option<String> {
    row.get(column)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_AUTOMATION_URL;

    fn row(pairs: &[(&str, &str)]) -> SheetRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_credential_from_row() {
        let credential = Credential::from_row(&row(&[
            ("Email", "user1@example.com"),
            ("Password", "password123"),
            ("Name", "Test User 1"),
            ("Description", ""),
        ]))
        .unwrap();

        assert_eq!(credential.email, "user1@example.com");
        assert_eq!(credential.name.as_deref(), Some("Test User 1"));
        assert_eq!(credential.description, None);
        assert_eq!(credential.masked_password(), "*".repeat("password123".len()));
    }

    #[test]
    fn test_credential_requires_email_and_password() {
        assert!(Credential::from_row(&row(&[("Email", "a@b.c")])).is_none());
        assert!(Credential::from_row(&row(&[("Email", " "), ("Password", "x")])).is_none());
    }

    #[test]
    fn test_sign_up_confirm_password_defaults_to_password() {
        let request = SignUpRequest::from_row(
            &row(&[
                ("FirstName", "Asha"),
                ("LastName", "Rao"),
                ("Email", "asha@example.com"),
                ("Mobile", "9876543210"),
                ("Password", "Testing@12345"),
            ]),
            DEFAULT_AUTOMATION_URL,
            true,
        );

        assert_eq!(request.confirm_password, "Testing@12345");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_sign_up_requires_all_fields() {
        let request = SignUpRequest::from_row(
            &row(&[("FirstName", "Asha"), ("Email", "asha@example.com")]),
            DEFAULT_AUTOMATION_URL,
            true,
        );
        let err = request.validate().unwrap_err();
        assert_eq!(err.user_message(), "All fields are required");
    }

    #[test]
    fn test_batches_skip_incomplete_rows() {
        let rows = vec![
            row(&[("Email", "one@example.com"), ("Password", "p1")]),
            row(&[("Email", "two@example.com")]),
            row(&[("Email", "three@example.com"), ("Password", "p3")]),
        ];

        let batch = sign_in_batch(&rows, DEFAULT_AUTOMATION_URL, false);
        assert_eq!(batch.requests.len(), 2);
        assert_eq!(batch.skipped_rows, vec![2]);
        assert!(!batch.requests[0].headless);

        let forgot = forgot_batch(&rows, true);
        assert_eq!(forgot.requests.len(), 3);
        assert!(forgot.skipped_rows.is_empty());
    }

    #[test]
    fn test_sign_in_serializes_wire_fields() {
        let request = SignInRequest {
            email: "qa@example.com".to_string(),
            password: "secret".to_string(),
            url: DEFAULT_AUTOMATION_URL.to_string(),
            headless: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["email"], "qa@example.com");
        assert_eq!(value["url"], DEFAULT_AUTOMATION_URL);
        assert_eq!(value["headless"], true);
    }

    #[test]
    fn test_outcome_summary() {
        let ok = AutomationOutcome {
            success: true,
            ..Default::default()
        };
        assert_eq!(
            ok.summary(AutomationKind::SignIn),
            "Sign-in automation completed successfully"
        );

        let failed = AutomationOutcome {
            success: false,
            error: Some("ChromeDriver not found".to_string()),
            ..Default::default()
        };
        assert_eq!(failed.summary(AutomationKind::SignUp), "ChromeDriver not found");

        let bare = AutomationOutcome::default();
        assert_eq!(bare.summary(AutomationKind::Forgot), "Forgot-password failed");
    }

    #[test]
    fn test_failed_outcome_surfaces_error_detail() {
        let outcome: AutomationOutcome = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "Sign-in automation failed",
            "output": "Opening https://qa.systemisers.in/",
            "error": "Traceback (most recent call last):\n  ...\nWebDriverException: chromedriver not found\n"
        }))
        .unwrap();

        let text = outcome.summary(AutomationKind::SignIn);
        assert!(text.starts_with("Sign-in automation failed"));
        assert!(text.contains("chromedriver not found"));

        let panels = outcome.panels();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0], ("Output", "Opening https://qa.systemisers.in/"));
        assert_eq!(panels[1].0, "Error");
        assert!(panels[1].1.contains("Traceback"));
    }

    #[test]
    fn test_successful_outcome_keeps_message_and_output_panel() {
        let outcome = AutomationOutcome {
            success: true,
            message: Some("Sign-in automation completed".to_string()),
            output: Some("Logged in".to_string()),
            error: Some("  ".to_string()),
        };
        assert_eq!(outcome.summary(AutomationKind::SignIn), "Sign-in automation completed");
        assert_eq!(outcome.panels(), vec![("Output", "Logged in")]);
    }
}
