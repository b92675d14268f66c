//! Adcraft engine: backend IO, timer lines and the session runner.
mod backend;
mod session;
mod timers;
mod types;

pub use backend::{BackendSettings, HttpJobBackend, JobBackend};
pub use session::{ChannelObserver, SessionEvent, SessionHandle, SessionObserver};
pub use timers::{TimerLine, TimerLines};
pub use types::{
    campaign_matches, AcceptedJob, AdScript, BackendError, Campaign, CampaignChanges, NewCampaign,
    RedditReference,
};
