use adcraft_logging::{adcraft_debug, adcraft_warn};

use crate::{FailureReason, Job, JobId, JobStatus, StatusReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollLimits {
    pub max_consecutive_failures: u32,
    pub max_attempts: Option<u32>,
}

/// What the runtime should do when the poll timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickAction {
    Fetch(JobId),
    /// Stopped, or the previous fetch has not resolved yet.
    Wait,
    /// The attempt budget is exhausted; the poller is now stopped.
    TimedOut { attempts: u32 },
}

/// Result of folding one fetch result into the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    InProgress(JobStatus),
    Completed(Option<String>),
    Failed(FailureReason),
    /// A status read failed but the threshold has not been reached.
    TransientError { consecutive_failures: u32 },
    /// The poller was already stopped; the response is discarded.
    Ignored,
}

/// Tick-driven status checks for a single job.
///
/// The poller owns no timer. The runtime reports timer ticks and fetch
/// results; once a terminal report has been produced every further tick and
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusPoller {
    job: Job,
    limits: PollLimits,
    attempts: u32,
    consecutive_failures: u32,
    in_flight: bool,
    stopped: bool,
}

impl JobStatusPoller {
    pub fn new(job: Job, limits: PollLimits) -> Self {
        Self {
            job,
            limits,
            attempts: 0,
            consecutive_failures: 0,
            in_flight: false,
            stopped: false,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn on_tick(&mut self) -> TickAction {
        if self.stopped {
            return TickAction::Wait;
        }
        if self.in_flight {
            adcraft_debug!(
                "Poll tick for job {} skipped: previous fetch still in flight",
                self.job.id
            );
            return TickAction::Wait;
        }
        if let Some(max) = self.limits.max_attempts {
            if self.attempts >= max {
                self.stopped = true;
                return TickAction::TimedOut {
                    attempts: self.attempts,
                };
            }
        }
        self.attempts += 1;
        self.in_flight = true;
        TickAction::Fetch(self.job.id.clone())
    }

    pub fn on_response(&mut self, result: Result<StatusReport, String>) -> PollEvent {
        if self.stopped {
            return PollEvent::Ignored;
        }
        self.in_flight = false;

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                self.consecutive_failures += 1;
                adcraft_warn!(
                    "Status check {} for job {} failed ({}/{}): {}",
                    self.attempts,
                    self.job.id,
                    self.consecutive_failures,
                    self.limits.max_consecutive_failures,
                    err
                );
                if self.consecutive_failures >= self.limits.max_consecutive_failures {
                    self.stopped = true;
                    return PollEvent::Failed(FailureReason::PollingUnreliable {
                        consecutive_failures: self.consecutive_failures,
                    });
                }
                return PollEvent::TransientError {
                    consecutive_failures: self.consecutive_failures,
                };
            }
        };

        self.consecutive_failures = 0;
        self.job.apply(&report);
        match report.status {
            JobStatus::Completed => {
                self.stopped = true;
                PollEvent::Completed(self.job.result.clone())
            }
            JobStatus::Failed => {
                self.stopped = true;
                PollEvent::Failed(FailureReason::JobFailed(self.job.error.clone()))
            }
            status @ (JobStatus::Pending | JobStatus::Processing) => PollEvent::InProgress(status),
        }
    }

    /// Stops the poller; later ticks wait and later responses are ignored.
    pub fn cancel(&mut self) {
        self.stopped = true;
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobKind;
    use chrono::Utc;

    fn poller(limits: PollLimits) -> JobStatusPoller {
        JobStatusPoller::new(
            Job::accepted("42".to_string(), JobKind::Script, Utc::now()),
            limits,
        )
    }

    fn default_limits() -> PollLimits {
        PollLimits {
            max_consecutive_failures: 3,
            max_attempts: None,
        }
    }

    #[test]
    fn tick_fetches_once_until_response_arrives() {
        let mut poller = poller(default_limits());
        assert_eq!(poller.on_tick(), TickAction::Fetch("42".to_string()));
        assert_eq!(poller.on_tick(), TickAction::Wait);
        assert_eq!(
            poller.on_response(Ok(StatusReport::new(JobStatus::Processing))),
            PollEvent::InProgress(JobStatus::Processing)
        );
        assert_eq!(poller.on_tick(), TickAction::Fetch("42".to_string()));
        assert_eq!(poller.attempts(), 2);
    }

    #[test]
    fn completion_is_reported_once() {
        let mut poller = poller(default_limits());
        poller.on_tick();
        assert_eq!(
            poller.on_response(Ok(StatusReport::completed("url123"))),
            PollEvent::Completed(Some("url123".to_string()))
        );
        assert_eq!(
            poller.on_response(Ok(StatusReport::completed("url123"))),
            PollEvent::Ignored
        );
        assert_eq!(poller.on_tick(), TickAction::Wait);
        assert_eq!(poller.job().status, JobStatus::Completed);
    }

    #[test]
    fn backend_failure_is_terminal() {
        let mut poller = poller(default_limits());
        poller.on_tick();
        assert_eq!(
            poller.on_response(Ok(StatusReport::failed("provider quota exceeded"))),
            PollEvent::Failed(FailureReason::JobFailed(Some(
                "provider quota exceeded".to_string()
            )))
        );
        assert!(poller.is_stopped());
    }

    #[test]
    fn fetch_errors_leave_status_untouched_until_threshold() {
        let mut poller = poller(default_limits());
        poller.on_tick();
        assert_eq!(
            poller.on_response(Err("connection refused".into())),
            PollEvent::TransientError {
                consecutive_failures: 1
            }
        );
        assert_eq!(poller.job().status, JobStatus::Pending);

        poller.on_tick();
        poller.on_response(Err("connection refused".into()));
        poller.on_tick();
        assert_eq!(
            poller.on_response(Err("connection refused".into())),
            PollEvent::Failed(FailureReason::PollingUnreliable {
                consecutive_failures: 3
            })
        );
        assert_eq!(poller.job().status, JobStatus::Pending);
    }

    #[test]
    fn successful_read_resets_failure_streak() {
        let mut poller = poller(default_limits());
        for _ in 0..2 {
            poller.on_tick();
            poller.on_response(Err("timeout".into()));
        }
        poller.on_tick();
        poller.on_response(Ok(StatusReport::new(JobStatus::Processing)));
        poller.on_tick();
        assert_eq!(
            poller.on_response(Err("timeout".into())),
            PollEvent::TransientError {
                consecutive_failures: 1
            }
        );
    }

    #[test]
    fn attempt_budget_times_out() {
        let mut poller = poller(PollLimits {
            max_consecutive_failures: 3,
            max_attempts: Some(2),
        });
        for _ in 0..2 {
            assert!(matches!(poller.on_tick(), TickAction::Fetch(_)));
            poller.on_response(Ok(StatusReport::new(JobStatus::Processing)));
        }
        assert_eq!(poller.on_tick(), TickAction::TimedOut { attempts: 2 });
        assert!(poller.is_stopped());
    }

    #[test]
    fn cancelled_poller_discards_in_flight_response() {
        let mut poller = poller(default_limits());
        poller.on_tick();
        poller.cancel();
        assert_eq!(
            poller.on_response(Ok(StatusReport::completed("late"))),
            PollEvent::Ignored
        );
        assert_eq!(poller.job().result, None);
    }
}
