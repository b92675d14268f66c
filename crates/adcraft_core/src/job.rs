use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque job identifier assigned by the backend.
pub type JobId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Script,
    Caption,
    Video,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Script => write!(f, "script"),
            JobKind::Caption => write!(f, "caption"),
            JobKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One status read as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    /// Result URL or generated text, present once the job completed.
    #[serde(default, alias = "result_url", alias = "content")]
    pub result: Option<String>,
    /// Backend-supplied failure detail.
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            result: None,
            error: None,
        }
    }

    pub fn completed(result: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// The job a session is tracking. Only poll responses mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub status: JobStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// A freshly accepted job: pending, no payload yet.
    pub fn accepted(id: JobId, kind: JobKind, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at,
        }
    }

    pub(crate) fn apply(&mut self, report: &StatusReport) {
        self.status = report.status;
        if report.result.is_some() {
            self.result.clone_from(&report.result);
        }
        if report.error.is_some() {
            self.error.clone_from(&report.error);
        }
    }
}

/// Target platform for generated content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    /// No specific platform; the backend writes generic copy.
    #[default]
    All,
    Named(String),
}

impl Platform {
    /// Parses user input; `"all"` (any case) and empty input mean every platform.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Platform::All
        } else {
            Platform::Named(trimmed.to_ascii_lowercase())
        }
    }

    /// Value sent to the backend. The backend expects `"none"` for all platforms.
    pub fn as_wire(&self) -> &str {
        match self {
            Platform::All => "none",
            Platform::Named(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::All => write!(f, "all"),
            Platform::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Immutable input bundle for one user-initiated generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: JobKind,
    pub provider: String,
    pub model: String,
    pub platforms: Vec<Platform>,
    pub campaign_id: u64,
}

impl GenerationRequest {
    pub fn new(
        kind: JobKind,
        provider: impl Into<String>,
        model: impl Into<String>,
        campaign_id: u64,
    ) -> Self {
        Self {
            kind,
            provider: provider.into(),
            model: model.into(),
            platforms: vec![Platform::All],
            campaign_id,
        }
    }

    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Wire values for the targeted platforms. Any `All` entry collapses the list.
    pub fn wire_platforms(&self) -> Vec<&str> {
        if self.platforms.is_empty() || self.platforms.contains(&Platform::All) {
            return vec![Platform::All.as_wire()];
        }
        self.platforms.iter().map(Platform::as_wire).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_all_is_sent_as_none() {
        assert_eq!(Platform::parse("All").as_wire(), "none");
        assert_eq!(Platform::parse("  ").as_wire(), "none");
        assert_eq!(Platform::parse("TikTok").as_wire(), "tiktok");
    }

    #[test]
    fn wire_platforms_collapse_when_all_is_present() {
        let request = GenerationRequest::new(JobKind::Caption, "openai", "gpt-4", 1)
            .with_platforms(vec![Platform::parse("instagram"), Platform::All]);
        assert_eq!(request.wire_platforms(), vec!["none"]);

        let request = request.with_platforms(vec![
            Platform::parse("instagram"),
            Platform::parse("tiktok"),
        ]);
        assert_eq!(request.wire_platforms(), vec!["instagram", "tiktok"]);
    }

    #[test]
    fn apply_keeps_payload_once_seen() {
        let mut job = Job::accepted("7".to_string(), JobKind::Video, Utc::now());
        job.apply(&StatusReport::completed("https://cdn.example.com/v.mp4"));
        job.apply(&StatusReport::new(JobStatus::Completed));

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result.as_deref(), Some("https://cdn.example.com/v.mp4"));
    }

    #[test]
    fn status_report_accepts_result_url_alias() {
        let report: StatusReport =
            serde_json::from_str(r#"{"status":"completed","result_url":"url123"}"#).unwrap();
        assert_eq!(report, StatusReport::completed("url123"));
    }
}
