use adcraft_core::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status}: {detail}")]
    HttpStatus { status: u16, detail: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// The create-job response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AcceptedJob {
    #[serde(alias = "id", deserialize_with = "opaque_id")]
    pub job_id: JobId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AcceptedJob {
    pub fn new(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: job_id.into(),
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Campaign {
    pub id: u64,
    pub user_id: u64,
    pub product_name: String,
    pub product_description: String,
    pub target_audience: String,
    pub key_use_cases: String,
    pub campaign_goal: String,
    pub niche: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Case-insensitive search over product name, niche and description.
/// A blank query matches everything.
pub fn campaign_matches(campaign: &Campaign, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [
        &campaign.product_name,
        &campaign.niche,
        &campaign.product_description,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Body of a create-campaign call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCampaign {
    pub product_name: String,
    pub product_description: String,
    pub target_audience: String,
    pub key_use_cases: String,
    pub campaign_goal: String,
    pub niche: String,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CampaignChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_use_cases: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
}

impl CampaignChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedditReference {
    pub title: String,
    pub content: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdScript {
    pub id: u64,
    pub campaign_id: u64,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub platform: Option<String>,
    pub content: String,
    #[serde(default)]
    pub reddit_references: Vec<RedditReference>,
    pub created_at: DateTime<Utc>,
}

/// Job ids are opaque; backends send either strings or integers.
fn opaque_id<'de, D>(deserializer: D) -> Result<JobId, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "job id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{campaign_matches, AcceptedJob, Campaign, CampaignChanges};
    use chrono::Utc;

    fn campaign() -> Campaign {
        Campaign {
            id: 1,
            user_id: 1,
            product_name: "SleepWell Mattress".to_string(),
            product_description: "Premium memory foam for back pain relief.".to_string(),
            target_audience: "Adults 25-45".to_string(),
            key_use_cases: "Better sleep".to_string(),
            campaign_goal: "Increase online sales".to_string(),
            niche: "Health & Wellness".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn search_is_case_insensitive_across_name_niche_and_description() {
        let campaign = campaign();
        assert!(campaign_matches(&campaign, "sleepwell"));
        assert!(campaign_matches(&campaign, "WELLNESS"));
        assert!(campaign_matches(&campaign, "memory foam"));
        assert!(campaign_matches(&campaign, "  "));
        // Audience and goal are not searched.
        assert!(!campaign_matches(&campaign, "adults"));
        assert!(!campaign_matches(&campaign, "online sales"));
    }

    #[test]
    fn campaign_changes_send_only_set_fields() {
        assert!(CampaignChanges::default().is_empty());
        let changes = CampaignChanges {
            niche: Some("Home".to_string()),
            ..CampaignChanges::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            serde_json::json!({ "niche": "Home" })
        );
    }

    #[test]
    fn accepted_job_takes_numeric_or_string_ids() {
        let numeric: AcceptedJob = serde_json::from_str(r#"{"job_id": 42}"#).unwrap();
        assert_eq!(numeric, AcceptedJob::new("42"));

        let aliased: AcceptedJob =
            serde_json::from_str(r#"{"id": "job-7", "created_at": "2024-05-02T14:25:00Z"}"#)
                .unwrap();
        assert_eq!(aliased.job_id, "job-7");
        assert!(aliased.created_at.is_some());

        assert!(serde_json::from_str::<AcceptedJob>(r#"{"job_id": null}"#).is_err());
    }
}
