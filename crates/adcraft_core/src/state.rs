use std::fmt;

use chrono::{DateTime, Utc};

use crate::poller::PollLimits;
use crate::view_model::SessionViewModel;
use crate::{
    GenerationRequest, Job, JobId, JobKind, JobStatusPoller, Outcome, ProgressEstimator, SessionConfig,
    StepNarrator,
};

/// Session-local generation counter.
///
/// Bumped by every submit and cancel. Effects carry the ticket they were issued
/// under and messages echo it back, so anything stamped with an older ticket is
/// known to be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Submitting,
    Active,
    Completed,
    Failed,
    Cancelled,
}

impl SessionPhase {
    /// Submitting or Active: a ticket's timers or backend calls may be live.
    pub fn is_busy(self) -> bool {
        matches!(self, SessionPhase::Submitting | SessionPhase::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub percent: u8,
    pub message: Option<String>,
    pub ticks: u32,
}

/// State of one generation session: at most one job at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSession {
    config: SessionConfig,
    phase: SessionPhase,
    ticket: Ticket,
    request: Option<GenerationRequest>,
    poller: Option<JobStatusPoller>,
    estimator: ProgressEstimator,
    narrator: StepNarrator,
    outcome: Option<Outcome>,
}

impl Default for GenerationSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GenerationSession {
    pub fn new(config: SessionConfig) -> Self {
        let narrator = StepNarrator::new(config.narration_steps.clone());
        Self {
            config,
            phase: SessionPhase::Idle,
            ticket: Ticket::default(),
            request: None,
            poller: None,
            estimator: ProgressEstimator::new(),
            narrator,
            outcome: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn request(&self) -> Option<&GenerationRequest> {
        self.request.as_ref()
    }

    pub fn job(&self) -> Option<&Job> {
        self.poller.as_ref().map(JobStatusPoller::job)
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn progress(&self) -> ProgressState {
        ProgressState {
            percent: self.estimator.percent(),
            message: self.narrator.current().map(str::to_owned),
            ticks: self.estimator.status_ticks(),
        }
    }

    pub fn view(&self) -> SessionViewModel {
        let job = self.job();
        SessionViewModel {
            phase: self.phase,
            job_id: job.map(|job| job.id.clone()),
            job_status: job.map(|job| job.status),
            progress: self.progress(),
            narration_index: self.narrator.index(),
            outcome: self.outcome.clone(),
        }
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.ticket
    }

    /// Clears job, estimator and narrator state under a fresh ticket.
    pub(crate) fn reset(&mut self) {
        self.ticket = self.ticket.next();
        if let Some(poller) = self.poller.as_mut() {
            poller.cancel();
        }
        self.poller = None;
        self.request = None;
        self.outcome = None;
        self.estimator.reset();
        self.narrator.deactivate();
    }

    pub(crate) fn begin_submit(&mut self, request: GenerationRequest) {
        self.request = Some(request);
        self.phase = SessionPhase::Submitting;
    }

    pub(crate) fn activate(&mut self, job_id: JobId, accepted_at: DateTime<Utc>) {
        let kind = self
            .request
            .as_ref()
            .map(|request| request.kind)
            .unwrap_or(JobKind::Script);
        let limits = PollLimits {
            max_consecutive_failures: self.config.max_consecutive_poll_failures.max(1),
            max_attempts: self.config.max_poll_attempts,
        };
        self.poller = Some(JobStatusPoller::new(
            Job::accepted(job_id, kind, accepted_at),
            limits,
        ));
        self.estimator.accept();
        self.narrator.activate();
        self.phase = SessionPhase::Active;
    }

    pub(crate) fn poller_mut(&mut self) -> Option<&mut JobStatusPoller> {
        self.poller.as_mut()
    }

    pub(crate) fn estimator_mut(&mut self) -> &mut ProgressEstimator {
        &mut self.estimator
    }

    pub(crate) fn narrator_mut(&mut self) -> &mut StepNarrator {
        &mut self.narrator
    }

    pub(crate) fn current_message(&self) -> String {
        self.narrator.current().unwrap_or_default().to_string()
    }

    /// Records the terminal outcome and stops narration.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.phase = if outcome.is_success() {
            SessionPhase::Completed
        } else {
            SessionPhase::Failed
        };
        self.narrator.deactivate();
        self.outcome = Some(outcome);
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.phase = SessionPhase::Cancelled;
    }
}
