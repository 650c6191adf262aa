//! Bulk-processing status poller.
//!
//! After a bulk submission returns a batch id, the poller waits a fixed
//! initial delay, then queries the status endpoint at a fixed interval until
//! the batch leaves the `processing` state or the attempt budget runs out.
//! A failed query never ends the loop early; it is reported to the observer
//! and the next scheduled query still happens.

use crate::config::MdfiveConfig;
use crate::error::{ReportApiError, Result};
use crate::traits::{BulkStatusSource, PollCallback};
use crate::types::{BatchState, BulkStatus};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

impl PollSchedule {
    pub fn from_config(config: &MdfiveConfig) -> Self {
        let defaults = Self::default();
        Self {
            initial_delay: config
                .polling
                .initial_delay_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.initial_delay),
            interval: config
                .polling
                .interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
            max_attempts: config.polling.max_attempts.unwrap_or(defaults.max_attempts).max(1),
        }
    }

    /// Offset from submission at which the given 1-based attempt is issued
    pub fn offset_of(&self, attempt: u32) -> Duration {
        self.initial_delay + self.interval * attempt.saturating_sub(1)
    }
}

/// What happened on a single attempt
#[derive(Debug)]
pub enum PollEvent {
    Status { attempt: u32, status: BulkStatus },
    Failed { attempt: u32, error: ReportApiError },
}

impl PollEvent {
    pub fn attempt(&self) -> u32 {
        match self {
            PollEvent::Status { attempt, .. } | PollEvent::Failed { attempt, .. } => *attempt,
        }
    }
}

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The batch reached `completed`; `status.results` holds the per-item results
    Completed { attempts: u32, status: BulkStatus },
    /// The batch reported a state this client does not know; polling stopped
    Stopped { attempts: u32, status: BulkStatus },
    /// The attempt budget ran out while the batch was still processing
    Exhausted {
        attempts: u32,
        last_status: Option<BulkStatus>,
    },
}

impl PollOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Completed { attempts, .. }
            | PollOutcome::Stopped { attempts, .. }
            | PollOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed { .. })
    }

    /// Latest status seen, if any query succeeded
    pub fn last_status(&self) -> Option<&BulkStatus> {
        match self {
            PollOutcome::Completed { status, .. } | PollOutcome::Stopped { status, .. } => Some(status),
            PollOutcome::Exhausted { last_status, .. } => last_status.as_ref(),
        }
    }
}

/// Polls bulk batches, one loop per batch id at a time
pub struct BulkStatusPoller<S> {
    source: S,
    schedule: PollSchedule,
    in_flight: Arc<Mutex<HashSet<String>>>,
    callback: Option<PollCallback>,
}

impl<S: BulkStatusSource> BulkStatusPoller<S> {
    pub fn new(source: S) -> Self {
        Self::with_schedule(source, PollSchedule::default())
    }

    pub fn with_schedule(source: S, schedule: PollSchedule) -> Self {
        Self {
            source,
            schedule,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            callback: None,
        }
    }

    /// Observe every attempt, e.g. to drive a spinner or print warnings
    #[must_use]
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(&PollEvent) + Send + Sync + 'static,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn schedule(&self) -> PollSchedule {
        self.schedule
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether a loop for `batch_id` is currently running on this poller
    pub fn is_polling(&self, batch_id: &str) -> bool {
        self.in_flight
            .lock()
            .map(|set| set.contains(batch_id))
            .unwrap_or(false)
    }

    /// Poll `batch_id` until it completes or the attempt budget is spent.
    ///
    /// Only an attempt to poll a batch that is already being polled returns an
    /// error; failed queries are reported through the callback instead.
    pub async fn poll(&self, batch_id: &str) -> Result<PollOutcome> {
        let _guard = InFlightGuard::register(&self.in_flight, batch_id)?;

        tokio::time::sleep(self.schedule.initial_delay).await;

        let mut last_status: Option<BulkStatus> = None;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.source.bulk_status(batch_id).await {
                Ok(status) => {
                    self.emit(&PollEvent::Status {
                        attempt,
                        status: status.clone(),
                    });
                    match status.status {
                        BatchState::Completed => {
                            return Ok(PollOutcome::Completed {
                                attempts: attempt,
                                status,
                            })
                        }
                        BatchState::Unknown => {
                            return Ok(PollOutcome::Stopped {
                                attempts: attempt,
                                status,
                            })
                        }
                        BatchState::Processing => last_status = Some(status),
                    }
                }
                Err(error) => self.emit(&PollEvent::Failed { attempt, error }),
            }

            if attempt >= self.schedule.max_attempts {
                return Ok(PollOutcome::Exhausted {
                    attempts: attempt,
                    last_status,
                });
            }

            tokio::time::sleep(self.schedule.interval).await;
        }
    }

    fn emit(&self, event: &PollEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }
}

/// Registration of a batch id in the in-flight set, released on drop
struct InFlightGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    batch_id: String,
}

impl InFlightGuard {
    fn register(in_flight: &Arc<Mutex<HashSet<String>>>, batch_id: &str) -> Result<Self> {
        let mut set = in_flight
            .lock()
            .map_err(|_| ReportApiError::api("poller state is unavailable"))?;
        if !set.insert(batch_id.to_string()) {
            return Err(ReportApiError::PollInProgress {
                batch_id: batch_id.to_string(),
            });
        }
        Ok(Self {
            in_flight: Arc::clone(in_flight),
            batch_id: batch_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.in_flight.lock() {
            set.remove(&self.batch_id);
        }
    }
}
