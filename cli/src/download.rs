use crate::cli::{DownloadAuth, DownloadTarget, GlobalArgs};
use crate::context::{self, AppContext};
use crate::error::{Result, ResultExt};
use crate::progress::with_spinner;
use crate::ui;
use dialoguer::{theme::ColorfulTheme, Password};
use report_api::{BulkDownloadRequest, DownloadRequest, DownloadedFile};
use std::path::Path;

pub fn execute(global: &GlobalArgs, target: DownloadTarget) -> Result<()> {
    let ctx = AppContext::load(global)?;
    match target {
        DownloadTarget::Single { report_id, auth } => {
            let password = resolve_password(auth.password.clone())?;
            let request = DownloadRequest {
                report_id,
                email: auth.email.clone(),
                password,
            };
            request.validate()?;

            context::block_on(async {
                let file = with_spinner(
                    &format!("Downloading report {report_id}"),
                    ctx.client.download_report(&request),
                )
                .await
                .with_context(|| format!("Failed to download report {report_id}"))?;
                save(&ctx, &file, &auth)
            })
        }
        DownloadTarget::Bulk { report_ids, auth } => {
            let password = resolve_password(auth.password.clone())?;
            let request = BulkDownloadRequest {
                report_ids,
                email: auth.email.clone(),
                password,
            };
            request.validate()?;

            context::block_on(async {
                let file = with_spinner(
                    &format!("Downloading {} reports", request.report_ids.len()),
                    ctx.client.download_bulk_reports(&request),
                )
                .await
                .with_context(|| "Failed to download reports")?;
                save(&ctx, &file, &auth)
            })
        }
    }
}

/// Use the password flag when given, otherwise prompt without echo
fn resolve_password(flag: Option<String>) -> Result<String> {
    match flag.filter(|p| !p.is_empty()) {
        Some(password) => Ok(password),
        None => Ok(Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?),
    }
}

fn save(ctx: &AppContext, file: &DownloadedFile, auth: &DownloadAuth) -> Result<()> {
    let path = file
        .save_to(Path::new(&auth.output))
        .with_context(|| format!("Failed to save {}", file.file_name))?;
    ctx.verbose(&format!("{} bytes, {}", file.len(), file.content_type));
    ui::success_message(&format!("Saved {}", path.display()));
    Ok(())
}
