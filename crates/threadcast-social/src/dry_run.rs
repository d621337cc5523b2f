use async_trait::async_trait;

use crate::error::PostError;
use crate::traits::{CreatedPost, PostClient};

/// Logs posts instead of sending them
#[derive(Debug, Default)]
pub struct DryRunClient;

impl DryRunClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PostClient for DryRunClient {
    async fn create_post(
        &self,
        text: &str,
        in_reply_to: Option<&str>,
    ) -> Result<CreatedPost, PostError> {
        let id = format!("dry-run-{}", uuid::Uuid::new_v4());
        tracing::info!(id = %id, in_reply_to = ?in_reply_to, "[dry run] {}", text);
        Ok(CreatedPost { id })
    }
}
