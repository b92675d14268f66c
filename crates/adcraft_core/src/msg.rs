use chrono::{DateTime, Utc};

use crate::{GenerationRequest, JobId, StatusReport, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Caller asked for a new generation.
    Submit(GenerationRequest),
    /// Caller aborted the session (explicitly or by tearing it down).
    Cancel,
    /// Backend accepted the create-job call.
    JobAccepted {
        ticket: Ticket,
        job_id: JobId,
        accepted_at: DateTime<Utc>,
    },
    /// Backend rejected the create-job call, or it never reached the backend.
    SubmitFailed { ticket: Ticket, error: String },
    /// Poll timer fired.
    PollTick { ticket: Ticket },
    /// A status fetch resolved.
    StatusFetched {
        ticket: Ticket,
        result: Result<StatusReport, String>,
    },
    /// Narration timer fired.
    NarrationTick { ticket: Ticket },
}

impl Msg {
    /// Ticket the message was issued under; caller messages carry none.
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Msg::JobAccepted { ticket, .. }
            | Msg::SubmitFailed { ticket, .. }
            | Msg::PollTick { ticket }
            | Msg::StatusFetched { ticket, .. }
            | Msg::NarrationTick { ticket } => Some(*ticket),
            Msg::Submit(_) | Msg::Cancel => None,
        }
    }
}
