use std::fmt;

/// Why a session ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The job could not be created (network or validation).
    Submission(String),
    /// The backend reported the job as failed.
    JobFailed(Option<String>),
    /// Too many consecutive status reads failed.
    PollingUnreliable { consecutive_failures: u32 },
    /// The configured poll attempt budget ran out.
    Timeout { attempts: u32 },
}

impl FailureReason {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::Submission(_) => "submission_error",
            FailureReason::JobFailed(_) => "job_failed",
            FailureReason::PollingUnreliable { .. } => "polling_unreliable",
            FailureReason::Timeout { .. } => "timeout",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Submission(detail) => write!(f, "submission failed: {detail}"),
            FailureReason::JobFailed(Some(detail)) => write!(f, "job failed: {detail}"),
            FailureReason::JobFailed(None) => write!(f, "job failed"),
            FailureReason::PollingUnreliable {
                consecutive_failures,
            } => write!(
                f,
                "polling unreliable ({consecutive_failures} consecutive status checks failed)"
            ),
            FailureReason::Timeout { attempts } => {
                write!(f, "timed out after {attempts} status checks")
            }
        }
    }
}

/// Terminal notification delivered to the caller at most once per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(Option<String>),
    Failed(FailureReason),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }
}
