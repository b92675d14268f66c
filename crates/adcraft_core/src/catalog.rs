use thiserror::Error;

use crate::{GenerationRequest, Platform};

/// An LLM provider and the models it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub models: &'static [&'static str],
}

impl ProviderInfo {
    pub fn offers(&self, model: &str) -> bool {
        self.models.iter().any(|candidate| *candidate == model)
    }
}

const PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        name: "openai",
        models: &["gpt-4", "gpt-3.5-turbo"],
    },
    ProviderInfo {
        name: "claude",
        models: &["claude-instant", "claude-2"],
    },
    ProviderInfo {
        name: "groq",
        models: &["llama-7b", "deepseek-r1-distill-llama-70b"],
    },
];

/// Built-in provider catalog, in display order.
pub fn providers() -> &'static [ProviderInfo] {
    PROVIDERS
}

/// Case-insensitive provider lookup.
pub fn find_provider(name: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS
        .iter()
        .find(|provider| provider.name.eq_ignore_ascii_case(name.trim()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("unknown provider {0:?}")]
    UnknownProvider(String),
    #[error("provider {provider} does not offer model {model:?}")]
    UnknownModel { provider: String, model: String },
    #[error("a campaign must be selected")]
    MissingCampaign,
    #[error("platform names must not be empty")]
    EmptyPlatform,
}

impl GenerationRequest {
    /// Checks the request against the provider catalog before it is submitted.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.campaign_id == 0 {
            return Err(RequestError::MissingCampaign);
        }
        let provider = find_provider(&self.provider)
            .ok_or_else(|| RequestError::UnknownProvider(self.provider.clone()))?;
        if !provider.offers(&self.model) {
            return Err(RequestError::UnknownModel {
                provider: provider.name.to_string(),
                model: self.model.clone(),
            });
        }
        let empty_name = self
            .platforms
            .iter()
            .any(|platform| matches!(platform, Platform::Named(name) if name.trim().is_empty()));
        if empty_name {
            return Err(RequestError::EmptyPlatform);
        }
        Ok(())
    }
}
