use crate::cli::{AutomationFlow, AutomationTarget, GlobalArgs, TemplateKind};
use crate::context::{self, AppContext};
use crate::error::{CliError, Result, ResultExt};
use crate::progress::{with_spinner, ProgressTracker};
use crate::ui;
use dialoguer::{theme::ColorfulTheme, Input, Password};
use report_api::automation::{forgot_batch, sign_in_batch, sign_up_batch};
use report_api::config::{
    generate_forgot_sheet, generate_signin_sheet, generate_signup_sheet, load_sheet_rows,
};
use report_api::{
    AutomationKind, AutomationOutcome, Credential, ForgotRequest, ReportClient, SheetBatch,
    SignInRequest, SignUpRequest,
};
use std::fs;

/// One automation run against the backend
#[derive(Debug, Clone)]
enum AutomationJob {
    SignIn(SignInRequest),
    SignUp(SignUpRequest),
    Forgot(ForgotRequest),
}

impl AutomationJob {
    fn kind(&self) -> AutomationKind {
        match self {
            AutomationJob::SignIn(_) => AutomationKind::SignIn,
            AutomationJob::SignUp(_) => AutomationKind::SignUp,
            AutomationJob::Forgot(_) => AutomationKind::Forgot,
        }
    }

    fn email(&self) -> &str {
        match self {
            AutomationJob::SignIn(r) => &r.email,
            AutomationJob::SignUp(r) => &r.email,
            AutomationJob::Forgot(r) => &r.email,
        }
    }

    async fn run(&self, client: &ReportClient) -> report_api::Result<AutomationOutcome> {
        match self {
            AutomationJob::SignIn(request) => client.sign_in(request).await,
            AutomationJob::SignUp(request) => client.sign_up(request).await,
            AutomationJob::Forgot(request) => client.forgot_password(request).await,
        }
    }
}

pub fn execute(global: &GlobalArgs, flow: Option<AutomationFlow>) -> Result<()> {
    let Some(flow) = flow else {
        print_index();
        return Ok(());
    };

    match flow {
        AutomationFlow::Template { kind, output } => write_template(kind, output),
        AutomationFlow::Signin {
            email,
            password,
            target,
        } => {
            let ctx = AppContext::load(global)?;
            let (url, headless) = site(&ctx, &target);
            match target.sheet.as_deref() {
                Some(sheet) => {
                    let rows = load_sheet_rows(sheet).with_context(|| format!("Failed to read {sheet}"))?;
                    let batch = sign_in_batch(&rows, &url, headless);
                    run_sheet(&ctx, map_batch(batch, AutomationJob::SignIn))
                }
                None => {
                    let credential = Credential {
                        email: prompt_if_missing(email, "Email")?,
                        password: password_if_missing(password)?,
                        name: None,
                        description: None,
                    };
                    ctx.verbose(&format!(
                        "Signing in as {} ({})",
                        credential.email,
                        credential.masked_password()
                    ));
                    let request = SignInRequest::from_credential(&credential, &url, headless);
                    run_single(&ctx, AutomationJob::SignIn(request))
                }
            }
        }
        AutomationFlow::Signup {
            first_name,
            last_name,
            email,
            mobile,
            password,
            confirm_password,
            target,
        } => {
            let ctx = AppContext::load(global)?;
            let (url, headless) = site(&ctx, &target);
            match target.sheet.as_deref() {
                Some(sheet) => {
                    let rows = load_sheet_rows(sheet).with_context(|| format!("Failed to read {sheet}"))?;
                    let batch = sign_up_batch(&rows, &url, headless);
                    run_sheet(&ctx, map_batch(batch, AutomationJob::SignUp))
                }
                None => {
                    let password = password_if_missing(password)?;
                    let request = SignUpRequest {
                        first_name: first_name.unwrap_or_default(),
                        last_name: last_name.unwrap_or_default(),
                        email: email.unwrap_or_default(),
                        mobile: mobile.unwrap_or_default(),
                        confirm_password: confirm_password
                            .filter(|p| !p.is_empty())
                            .unwrap_or_else(|| password.clone()),
                        password,
                        url,
                        headless,
                    };
                    request.validate()?;
                    run_single(&ctx, AutomationJob::SignUp(request))
                }
            }
        }
        AutomationFlow::Forgot { email, target } => {
            let ctx = AppContext::load(global)?;
            let (_, headless) = site(&ctx, &target);
            match target.sheet.as_deref() {
                Some(sheet) => {
                    let rows = load_sheet_rows(sheet).with_context(|| format!("Failed to read {sheet}"))?;
                    run_sheet(&ctx, map_batch(forgot_batch(&rows, headless), AutomationJob::Forgot))
                }
                None => {
                    let request = ForgotRequest {
                        email: prompt_if_missing(email, "Email")?,
                        headless,
                    };
                    run_single(&ctx, AutomationJob::Forgot(request))
                }
            }
        }
    }
}

/// The nested automation pages, shown for `mdfive automation` alone
fn print_index() {
    ui::section_header("Automation");
    ui::step_message(1, "signin   Sign in with an email and password, or a sheet of them");
    ui::step_message(2, "signup   Create accounts from fields or a sheet");
    ui::step_message(3, "forgot   Request password resets");
    ui::step_message(4, "template Write a sample sheet for bulk runs");
    ui::info_message("Run `mdfive automation <flow> --help` for the options of each flow");
}

fn write_template(kind: TemplateKind, output: Option<String>) -> Result<()> {
    let (default_name, content) = match kind {
        TemplateKind::Signin => ("signin_template.csv", generate_signin_sheet()),
        TemplateKind::Signup => ("signup_template.csv", generate_signup_sheet()),
        TemplateKind::Forgot => ("forgot_template.csv", generate_forgot_sheet()),
    };
    let path = output.unwrap_or_else(|| default_name.to_string());
    fs::write(&path, content).with_context(|| format!("Failed to write {path}"))?;
    ui::success_message(&format!("Template written to {path}"));
    Ok(())
}

/// Target site and headless flag after applying the command-line overrides
fn site(ctx: &AppContext, target: &AutomationTarget) -> (String, bool) {
    let url = target
        .url
        .clone()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| ctx.config.automation_url());
    let headless = !target.headed && ctx.config.headless();
    (url, headless)
}

fn map_batch<T>(batch: SheetBatch<T>, wrap: fn(T) -> AutomationJob) -> SheetBatch<AutomationJob> {
    SheetBatch {
        requests: batch.requests.into_iter().map(wrap).collect(),
        skipped_rows: batch.skipped_rows,
    }
}

fn run_single(ctx: &AppContext, job: AutomationJob) -> Result<()> {
    let kind = job.kind();
    context::block_on(async {
        let outcome = with_spinner(
            &format!("Running {kind} automation, this can take a minute"),
            job.run(&ctx.client),
        )
        .await
        .with_context(|| format!("{kind} request failed"))?;

        show_panels(&outcome);
        if outcome.success {
            ui::success_message(&outcome.summary(kind));
            Ok(())
        } else {
            Err(CliError::Other(outcome.summary(kind)))
        }
    })
}

/// Run every row in order; a failing row never stops the ones after it
fn run_sheet(ctx: &AppContext, batch: SheetBatch<AutomationJob>) -> Result<()> {
    if !batch.skipped_rows.is_empty() {
        ui::warning_message(&format!(
            "Skipping {} rows with missing columns: {}",
            batch.skipped_rows.len(),
            batch
                .skipped_rows
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    if batch.requests.is_empty() {
        return Err(CliError::Other("No usable rows found in the sheet".to_string()));
    }

    let total = batch.requests.len();
    let tracker = ProgressTracker::new("Bulk Automation");
    let failed = context::block_on(async {
        let mut failed = 0;
        for (index, job) in batch.requests.iter().enumerate() {
            let kind = job.kind();
            let label = format!("[{}/{total}] {}", index + 1, job.email());
            match with_spinner(&label, job.run(&ctx.client)).await {
                Ok(outcome) if outcome.success => {
                    ui::success_message(&format!("{label}: {}", outcome.summary(kind)));
                    show_panels(&outcome);
                }
                Ok(outcome) => {
                    failed += 1;
                    ui::error_message(&format!("{label}: {}", outcome.summary(kind)));
                    show_panels(&outcome);
                }
                Err(err) => {
                    failed += 1;
                    ui::error_message(&format!("{label}: {}", err.user_message()));
                }
            }
        }
        Ok(failed)
    })?;

    if failed == 0 {
        tracker.complete();
        Ok(())
    } else {
        Err(CliError::Other(format!("{failed} of {total} automation runs failed")))
    }
}

/// Print the run output and any error text under their labels
fn show_panels(outcome: &AutomationOutcome) {
    for (label, text) in outcome.panels() {
        ui::field(label, "");
        ui::block(&indent(text));
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .interact_text()?),
    }
}

fn password_if_missing(value: Option<String>) -> Result<String> {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => Ok(value),
        None => Ok(Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?),
    }
}
