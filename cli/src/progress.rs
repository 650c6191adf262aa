use crate::ui;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::{Duration, Instant};

/// Tracks the named steps of a multi-step command
pub struct ProgressTracker {
    operation_name: String,
    start_time: Instant,
    steps: Vec<String>,
    current_step: usize,
}

impl ProgressTracker {
    pub fn new(operation_name: &str) -> Self {
        ui::section_header(operation_name);
        Self {
            operation_name: operation_name.to_string(),
            start_time: Instant::now(),
            steps: Vec::new(),
            current_step: 0,
        }
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Announce the next step
    pub fn start_step(&self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::status_message(step);
        }
    }

    pub fn complete_step(&mut self) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::success_message(step);
            self.current_step += 1;
        }
    }

    pub fn skip_step(&mut self, reason: &str) {
        if let Some(step) = self.steps.get(self.current_step) {
            ui::warning_message(&format!("Skipped: {step} ({reason})"));
            self.current_step += 1;
        }
    }

    pub fn complete(&self) {
        ui::success_message(&format!(
            "{} completed in {}",
            self.operation_name,
            format_duration(self.start_time.elapsed())
        ));
    }
}

/// Spinner shown while a request is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Await `future` behind a spinner that is cleared once it resolves
pub async fn with_spinner<F, T>(message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    let pb = spinner(message);
    let output = future.await;
    pb.finish_and_clear();
    output
}

/// Format a duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    if seconds < 60 {
        format!("{seconds} seconds")
    } else if seconds < 3600 {
        format!(
            "{} minutes {seconds_remainder} seconds",
            seconds / 60,
            seconds_remainder = seconds % 60
        )
    } else {
        format!(
            "{hours} hours {minutes} minutes",
            hours = seconds / 3600,
            minutes = (seconds % 3600) / 60
        )
    }
}
