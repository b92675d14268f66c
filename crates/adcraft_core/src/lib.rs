//! Adcraft core: pure generation-session state machine and view-model helpers.
//!
//! Nothing in this crate performs IO or reads a clock. The runtime feeds
//! [`Msg`]s into [`update`] and executes the returned [`Effect`]s.
mod catalog;
mod config;
mod effect;
mod job;
mod msg;
mod narrator;
mod outcome;
mod poller;
mod progress;
mod state;
mod update;
mod view_model;

pub use catalog::{find_provider, providers, ProviderInfo, RequestError};
pub use config::{
    SessionConfig, DEFAULT_MAX_CONSECUTIVE_POLL_FAILURES, DEFAULT_NARRATION_INTERVAL,
    DEFAULT_NARRATION_STEPS, DEFAULT_POLL_INTERVAL,
};
pub use effect::Effect;
pub use job::{GenerationRequest, Job, JobId, JobKind, JobStatus, Platform, StatusReport};
pub use msg::Msg;
pub use narrator::StepNarrator;
pub use outcome::{FailureReason, Outcome};
pub use poller::{JobStatusPoller, PollEvent, PollLimits, TickAction};
pub use progress::{
    ProgressEstimator, ACCEPTED_PERCENT, COMPLETED_PERCENT, PROCESSING_CAP_PERCENT,
    PROCESSING_PERCENT, STEP_PERCENT,
};
pub use state::{GenerationSession, ProgressState, SessionPhase, Ticket};
pub use update::update;
pub use view_model::{provider_label, script_preview, SessionViewModel, PREVIEW_CHARS};
