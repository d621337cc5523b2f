use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PostError;

/// Trait for posting backends
///
/// A post with `in_reply_to` set is threaded under that post.
#[async_trait]
pub trait PostClient: Send + Sync {
    async fn create_post(
        &self,
        text: &str,
        in_reply_to: Option<&str>,
    ) -> Result<CreatedPost, PostError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPost {
    pub id: String,
}
