use crate::JobStatus;

pub const ACCEPTED_PERCENT: u8 = 10;
pub const PROCESSING_PERCENT: u8 = 30;
pub const STEP_PERCENT: u8 = 5;
pub const PROCESSING_CAP_PERCENT: u8 = 90;
pub const COMPLETED_PERCENT: u8 = 100;

/// Simulated progress for a job whose backend only reports coarse status.
///
/// The value is derived from the number of status ticks since acceptance,
/// never decreases while a job is active and only reaches 100 on completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressEstimator {
    percent: u8,
    status_ticks: u32,
    processing_seen: bool,
}

impl ProgressEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn status_ticks(&self) -> u32 {
        self.status_ticks
    }

    /// Job accepted by the backend.
    pub fn accept(&mut self) -> u8 {
        *self = Self {
            percent: ACCEPTED_PERCENT,
            ..Self::default()
        };
        self.percent
    }

    /// Folds one status read into the estimate.
    ///
    /// Pending reads count as status ticks too, so after a long pending
    /// phase the second processing read can jump from 30 straight to the cap.
    pub fn observe(&mut self, status: JobStatus) -> u8 {
        self.status_ticks = self.status_ticks.saturating_add(1);
        match status {
            JobStatus::Pending | JobStatus::Failed => {}
            JobStatus::Processing => {
                let candidate = if self.processing_seen {
                    let stepped = u32::from(STEP_PERCENT).saturating_mul(self.status_ticks);
                    u32::from(PROCESSING_PERCENT).saturating_add(stepped)
                } else {
                    self.processing_seen = true;
                    u32::from(PROCESSING_PERCENT)
                };
                let capped = candidate.min(u32::from(PROCESSING_CAP_PERCENT)) as u8;
                self.percent = self.percent.max(capped);
            }
            JobStatus::Completed => self.percent = COMPLETED_PERCENT,
        }
        self.percent
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
