use std::time::Duration;

use crate::{GenerationRequest, JobId, Outcome, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Call the backend's create-job endpoint.
    CreateJob {
        ticket: Ticket,
        request: GenerationRequest,
    },
    /// Arm the poll and narration timer lines, replacing any existing ones.
    ArmTimers {
        ticket: Ticket,
        poll_interval: Duration,
        narration_interval: Duration,
    },
    /// Fetch the job's status once.
    FetchStatus { ticket: Ticket, job_id: JobId },
    /// Drop both timer lines and abort any in-flight backend call.
    Disarm,
    /// Notify the caller of progress.
    Progress { percent: u8, message: String },
    /// Notify the caller of the terminal outcome.
    Terminal(Outcome),
}
