use std::time::Duration;

use adcraft_core::{GenerationRequest, JobKind, StatusReport};
use adcraft_logging::adcraft_debug;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{AcceptedJob, AdScript, BackendError, Campaign, CampaignChanges, NewCampaign};

const UNKNOWN_ERROR_DETAIL: &str = "An unknown error occurred";
const MISSING_ERROR_DETAIL: &str = "An error occurred";

/// The external job service a session drives.
#[async_trait::async_trait]
pub trait JobBackend: Send + Sync {
    async fn create_job(&self, request: &GenerationRequest) -> Result<AcceptedJob, BackendError>;

    async fn fetch_status(&self, job_id: &str) -> Result<StatusReport, BackendError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Bearer token obtained elsewhere; sent as-is when present.
    pub auth_token: Option<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }
}

/// REST client for the generation backend.
#[derive(Debug, Clone)]
pub struct HttpJobBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl HttpJobBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, BackendError> {
        let url = self.url(&["api", "campaigns", ""])?;
        self.send(self.client.get(url)).await
    }

    pub async fn get_campaign(&self, campaign_id: u64) -> Result<Campaign, BackendError> {
        let id = campaign_id.to_string();
        let url = self.url(&["api", "campaigns", id.as_str()])?;
        self.send(self.client.get(url)).await
    }

    pub async fn create_campaign(&self, campaign: &NewCampaign) -> Result<Campaign, BackendError> {
        let url = self.url(&["api", "campaigns", ""])?;
        adcraft_debug!("POST {} ({})", url, campaign.product_name);
        self.send(with_json(self.client.post(url), campaign)?).await
    }

    pub async fn update_campaign(
        &self,
        campaign_id: u64,
        changes: &CampaignChanges,
    ) -> Result<Campaign, BackendError> {
        let id = campaign_id.to_string();
        let url = self.url(&["api", "campaigns", id.as_str()])?;
        adcraft_debug!("PUT {}", url);
        self.send(with_json(self.client.put(url), changes)?).await
    }

    /// Deletes a campaign. Whatever body the backend returns is ignored.
    pub async fn delete_campaign(&self, campaign_id: u64) -> Result<(), BackendError> {
        let id = campaign_id.to_string();
        let url = self.url(&["api", "campaigns", id.as_str()])?;
        adcraft_debug!("DELETE {}", url);
        self.execute(self.client.delete(url)).await.map(drop)
    }

    pub async fn ad_scripts_for_campaign(
        &self,
        campaign_id: u64,
    ) -> Result<Vec<AdScript>, BackendError> {
        let id = campaign_id.to_string();
        let url = self.url(&["api", "ad-scripts", "campaign", id.as_str()])?;
        self.send(self.client.get(url)).await
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    /// An empty last segment keeps a trailing slash.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, BackendError> {
        let base = &self.settings.base_url;
        let mut url = reqwest::Url::parse(base.trim_end_matches('/'))
            .map_err(|err| BackendError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(format!("{base} cannot be a base url")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let builder = match &self.settings.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(BackendError::HttpStatus {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        Ok(body.to_vec())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let body = self.execute(builder).await?;
        serde_json::from_slice(&body).map_err(|err| BackendError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobBackend for HttpJobBackend {
    async fn create_job(&self, request: &GenerationRequest) -> Result<AcceptedJob, BackendError> {
        let url = self.url(&generate_path(request.kind))?;
        let platforms = request.wire_platforms();
        let body = serde_json::json!({
            "campaign_id": request.campaign_id,
            "provider": request.provider,
            "model": request.model,
            "platform": platforms.first().copied(),
            "platforms": platforms,
        });
        adcraft_debug!("POST {} {}", url, body);
        self.send(with_json(self.client.post(url), &body)?).await
    }

    async fn fetch_status(&self, job_id: &str) -> Result<StatusReport, BackendError> {
        let url = self.url(&["api", "jobs", job_id])?;
        self.send(self.client.get(url)).await
    }
}

fn with_json<B: Serialize + ?Sized>(
    builder: reqwest::RequestBuilder,
    body: &B,
) -> Result<reqwest::RequestBuilder, BackendError> {
    let payload = serde_json::to_vec(body).map_err(|err| BackendError::Decode(err.to_string()))?;
    Ok(builder.header(CONTENT_TYPE, "application/json").body(payload))
}

fn generate_path(kind: JobKind) -> [&'static str; 3] {
    match kind {
        JobKind::Script => ["api", "ad-scripts", "generate"],
        JobKind::Caption => ["api", "captions", "generate"],
        JobKind::Video => ["api", "videos", "generate"],
    }
}

/// Extracts the `detail` field of an error body.
fn error_detail(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return UNKNOWN_ERROR_DETAIL.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Null) | None => MISSING_ERROR_DETAIL.to_string(),
        Some(other) => other.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Timeout;
    }
    if err.is_builder() {
        return BackendError::InvalidUrl(err.to_string());
    }
    BackendError::Network(err.to_string())
}
