use anyhow::Result;
use async_trait::async_trait;

/// Trait for single-shot text generation backends
///
/// Implementations turn one prompt into one raw text blob. Interpreting the
/// text (splitting into segments, trimming) is left to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Non-streaming text generation
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub max_new_tokens: Option<u32>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_new_tokens(mut self, tokens: u32) -> Self {
        self.max_new_tokens = Some(tokens);
        self
    }
}

#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
    pub raw: serde_json::Value,
}
