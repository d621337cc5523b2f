// Configuration layer for provider-agnostic generator creation
// This module provides a factory pattern for creating text generators from configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the Hugging Face inference provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    pub api_key: String,
    /// Base URL for the inference API (optional, defaults to https://api-inference.huggingface.co)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (optional, defaults to 60)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl HuggingFaceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Provider-specific configuration details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderDetails {
    HuggingFace(HuggingFaceConfig),
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(flatten)]
    pub details: ProviderDetails,
}

impl ProviderConfig {
    /// Create Hugging Face provider config
    pub fn huggingface(api_key: impl Into<String>) -> Self {
        Self {
            details: ProviderDetails::HuggingFace(HuggingFaceConfig::new(api_key)),
        }
    }

    pub fn from_huggingface(config: HuggingFaceConfig) -> Self {
        Self {
            details: ProviderDetails::HuggingFace(config),
        }
    }
}

/// Factory for creating generators from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a text generator from provider configuration
    pub fn create_generator(config: ProviderConfig) -> Result<Arc<dyn crate::traits::TextGenerator>> {
        match config.details {
            ProviderDetails::HuggingFace(hf_config) => {
                let timeout = hf_config
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(Duration::from_secs(60));
                let mut client =
                    crate::huggingface::HuggingFaceClient::with_timeout(hf_config.api_key, timeout)?;
                if let Some(base_url) = hf_config.base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
        }
    }
}
