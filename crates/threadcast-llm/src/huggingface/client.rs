// Hugging Face Inference API client

use crate::traits::{GenerateOptions, GenerateRequest, GenerateResponse, TextGenerator};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

pub const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Hugging Face inference client (HTTP direct, no SDK)
pub struct HuggingFaceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HuggingFaceClient {
    /// Create new client with API key and the default 60s request timeout
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: HF_INFERENCE_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    /// Build inference request payload
    fn build_payload(&self, prompt: &str, options: &GenerateOptions) -> Value {
        let mut parameters = serde_json::Map::new();
        if let Some(max_new_tokens) = options.max_new_tokens {
            parameters.insert("max_new_tokens".to_string(), serde_json::json!(max_new_tokens));
        }

        serde_json::json!({
            "inputs": prompt,
            "parameters": parameters,
        })
    }
}

/// Pull the generated text out of an inference response.
///
/// `[{"generated_text": "..."}]` yields the text. Any other shape is passed
/// on as its JSON text, except an empty array or a non-string
/// `generated_text`, which are errors.
pub fn extract_generated_text(raw: &Value) -> Result<String> {
    match raw {
        Value::Array(items) => {
            let first = items
                .first()
                .context("Inference response is an empty array")?;
            match first.get("generated_text") {
                Some(Value::String(text)) => Ok(text.clone()),
                Some(other) => anyhow::bail!(
                    "generated_text is not a string: {}",
                    other
                ),
                None => Ok(raw.to_string()),
            }
        }
        other => Ok(other.to_string()),
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let payload = self.build_payload(&request.prompt, &request.options);
        let url = self.model_url(&request.model);

        tracing::debug!(model = %request.model, "Sending inference request");

        let response = self
            .http_client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("HF API error {}: {}", status.as_u16(), error_text);
        }

        let raw: Value = response
            .json()
            .await
            .context("Failed to parse response")?;

        let text = extract_generated_text(&raw)?;
        Ok(GenerateResponse { text, raw })
    }
}
