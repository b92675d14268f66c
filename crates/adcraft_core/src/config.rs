use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_NARRATION_INTERVAL: Duration = Duration::from_millis(2500);
pub const DEFAULT_MAX_CONSECUTIVE_POLL_FAILURES: u32 = 3;

pub const DEFAULT_NARRATION_STEPS: &[&str] = &[
    "Scraping source data...",
    "Analyzing audience...",
    "Mining community discussions...",
    "Drafting hooks...",
    "Polishing copy...",
    "Preparing final result...",
];

/// Timing and policy knobs for a generation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    pub narration_interval: Duration,
    pub narration_steps: Vec<String>,
    /// Consecutive failed status reads tolerated before the session fails.
    pub max_consecutive_poll_failures: u32,
    /// Status reads allowed before the session times out. `None` polls forever.
    pub max_poll_attempts: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            narration_interval: DEFAULT_NARRATION_INTERVAL,
            narration_steps: DEFAULT_NARRATION_STEPS
                .iter()
                .map(|step| (*step).to_string())
                .collect(),
            max_consecutive_poll_failures: DEFAULT_MAX_CONSECUTIVE_POLL_FAILURES,
            max_poll_attempts: None,
        }
    }
}
