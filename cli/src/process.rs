use crate::cli::{GlobalArgs, ProcessAction};
use crate::context::{self, AppContext};
use crate::error::{Result, ResultExt};
use crate::progress::{self, with_spinner, ProgressTracker};
use crate::ui;
use colored::Colorize;
use report_api::renderers::{bulk_results_table, process_all_tables};
use report_api::{BulkStatus, BulkStatusPoller, PollEvent, PollOutcome, PollSchedule};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn execute(global: &GlobalArgs, action: ProcessAction) -> Result<()> {
    let ctx = AppContext::load(global)?;
    context::block_on(async {
        match action {
            ProcessAction::Single { report_name } => process_single(&ctx, &report_name).await,
            ProcessAction::Bulk {
                report_names,
                file,
                no_wait,
            } => {
                let names = collect_names(report_names, file.as_deref())?;
                process_bulk(&ctx, &names, no_wait).await
            }
            ProcessAction::All => process_all(&ctx).await,
            ProcessAction::Status { batch_id } => {
                ui::section_header("Bulk Status");
                let outcome = wait_for_batch(&ctx, &batch_id).await?;
                report_outcome(&batch_id, &outcome);
                Ok(())
            }
        }
    })
}

async fn process_single(ctx: &AppContext, report_name: &str) -> Result<()> {
    let processed = with_spinner(
        &format!("Processing {}", report_name.trim()),
        ctx.client.process_single_report(report_name),
    )
    .await
    .with_context(|| format!("Failed to process {}", report_name.trim()))?;

    ui::success_message(&format!(
        "Report processed successfully, new report id {}",
        processed.report_id
    ));
    Ok(())
}

async fn process_bulk(ctx: &AppContext, names: &[String], no_wait: bool) -> Result<()> {
    let mut tracker = ProgressTracker::new("Bulk Processing").with_steps(vec![
        format!("Submitting {} report names", names.len()),
        "Waiting for the batch to finish".to_string(),
    ]);

    tracker.start_step();
    let submission = ctx
        .client
        .process_bulk_reports(names)
        .await
        .with_context(|| "Failed to submit bulk batch")?;
    tracker.complete_step();
    ui::info_message(&format!("Batch id: {}", submission.batch_id));

    if no_wait {
        tracker.skip_step("--no-wait");
        ui::info_message(&format!(
            "Check progress with `mdfive process status {}`",
            submission.batch_id
        ));
        return Ok(());
    }

    tracker.start_step();
    let outcome = wait_for_batch(ctx, &submission.batch_id).await?;
    report_outcome(&submission.batch_id, &outcome);
    if outcome.is_completed() {
        tracker.complete_step();
        tracker.complete();
    }
    Ok(())
}

async fn process_all(ctx: &AppContext) -> Result<()> {
    let summary = with_spinner("Processing all reports", ctx.client.process_all_reports())
        .await
        .with_context(|| "Failed to process all reports")?;

    ui::section_header("Process All Reports");
    ui::block(&process_all_tables(&summary));
    if summary.failed.is_empty() {
        ui::success_message(&format!("{} reports processed", summary.processed.len()));
    } else {
        ui::warning_message(&format!("{} reports failed", summary.failed.len()));
    }
    Ok(())
}

/// Poll `batch_id` behind a spinner; failed attempts are printed, never fatal
async fn wait_for_batch(ctx: &AppContext, batch_id: &str) -> Result<PollOutcome> {
    let schedule = PollSchedule::from_config(&ctx.config);
    ctx.verbose(&format!(
        "Polling every {} for up to {} attempts",
        progress::format_duration(schedule.interval),
        schedule.max_attempts
    ));

    let pb = progress::spinner(&format!("Waiting for batch {batch_id}"));
    let events = pb.clone();
    let verbose = ctx.verbose;
    let failures = FailureNotices::new(schedule.max_attempts);
    let poller = BulkStatusPoller::with_schedule(ctx.client.clone(), schedule).on_event(
        move |event| match event {
            PollEvent::Status { attempt, status } => {
                events.set_message(progress_label(status));
                if verbose {
                    events.println(format!("  › attempt {attempt}: {}", progress_label(status)));
                }
            }
            PollEvent::Failed { attempt, error } => {
                if let Some(line) = failures.notice(*attempt, &error.user_message(), verbose) {
                    events.println(line);
                }
            }
        },
    );

    let outcome = poller.poll(batch_id).await;
    pb.finish_and_clear();
    Ok(outcome?)
}

/// Decides which failed status checks get printed while polling continues.
/// The first failure is shown in full with how long polling will go on;
/// later ones only with `--verbose`.
struct FailureNotices {
    max_attempts: u32,
    seen: AtomicUsize,
}

impl FailureNotices {
    fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            seen: AtomicUsize::new(0),
        }
    }

    fn notice(&self, attempt: u32, message: &str, verbose: bool) -> Option<String> {
        let previous = self.seen.fetch_add(1, Ordering::SeqCst);
        if previous == 0 {
            let remaining = self.max_attempts.saturating_sub(attempt);
            Some(
                format!(
                    "❌ Status check failed: {message}\n   Still retrying ({remaining} checks left), press Ctrl-C to stop"
                )
                .red()
                .bold()
                .to_string(),
            )
        } else if verbose {
            Some(format!("  › attempt {attempt} failed: {message}"))
        } else {
            None
        }
    }
}

fn progress_label(status: &BulkStatus) -> String {
    match (status.processed, status.total) {
        (Some(processed), Some(total)) => format!("Processed {processed}/{total}"),
        _ => format!("Status: {:?}", status.status).to_lowercase(),
    }
}

fn report_outcome(batch_id: &str, outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Completed { status, attempts } => {
            ui::success_message(&format!(
                "Batch completed after {attempts} checks: {} succeeded, {} failed",
                status.succeeded(),
                status.failed()
            ));
            if !status.results.is_empty() {
                ui::block(&bulk_results_table(&status.results));
            }
        }
        PollOutcome::Stopped { status, .. } => {
            ui::warning_message(&format!(
                "Batch {batch_id} reported an unexpected status, polling stopped"
            ));
            if !status.results.is_empty() {
                ui::block(&bulk_results_table(&status.results));
            }
        }
        PollOutcome::Exhausted {
            attempts,
            last_status,
        } => {
            let progress = last_status
                .as_ref()
                .map(progress_label)
                .unwrap_or_else(|| "no status received".to_string());
            ui::warning_message(&format!(
                "Batch {batch_id} is still processing after {attempts} checks ({progress})"
            ));
            ui::info_message(&format!("Resume with `mdfive process status {batch_id}`"));
        }
    }
}

/// Names from the command line followed by the lines of `file`
fn collect_names(mut names: Vec<String>, file: Option<&str>) -> Result<Vec<String>> {
    if let Some(path) = file {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read report names from {path}"))?;
        names.extend(content.lines().map(str::to_string));
    }
    Ok(names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect())
}
