use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Posting API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Rate limited by posting API (reset at {})", .reset_at.as_ref().map(|t| t.to_rfc3339()).unwrap_or_else(|| "unknown".to_string()))]
    RateLimited { reset_at: Option<DateTime<Utc>> },

    #[error("Response has no post id: {0}")]
    MissingId(String),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// A thread post aborted after exhausting the retries for one segment
#[derive(Error, Debug)]
#[error(
    "Failed to post segment {position} of {total} after {attempts} attempts: {source}",
    position = .segment + 1
)]
pub struct PostThreadError {
    /// Zero-based index of the failing segment
    pub segment: usize,
    pub total: usize,
    pub attempts: u32,
    /// Ids of the segments that did go out before the failure
    pub posted_ids: Vec<String>,
    #[source]
    pub source: PostError,
}
