use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{PostError, PostThreadError};
use crate::traits::{CreatedPost, PostClient};

/// Retry and pacing settings for [`Poster`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterConfig {
    /// Attempts per segment, including the first
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub retry_base: Duration,
    /// Added to the delay for each further failed attempt
    pub retry_step: Duration,
    /// Pause between consecutive segments
    pub pacing: Duration,
    /// Upper bound when waiting out a rate limit
    pub max_rate_limit_wait: Duration,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_base: Duration::from_secs(2),
            retry_step: Duration::from_secs(2),
            pacing: Duration::from_secs(2),
            max_rate_limit_wait: Duration::from_secs(15 * 60),
        }
    }
}

impl PosterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_retry_backoff(mut self, base: Duration, step: Duration) -> Self {
        self.retry_base = base;
        self.retry_step = step;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_max_rate_limit_wait(mut self, wait: Duration) -> Self {
        self.max_rate_limit_wait = wait;
        self
    }

    /// Linear delay after the failed attempt with zero-based `attempt_index`
    pub fn retry_delay(&self, attempt_index: u32) -> Duration {
        self.retry_base + self.retry_step * attempt_index
    }
}

/// Posts a thread as a linear reply chain
pub struct Poster {
    client: Arc<dyn PostClient>,
    config: PosterConfig,
}

impl Poster {
    pub fn new(client: Arc<dyn PostClient>) -> Self {
        Self::with_config(client, PosterConfig::default())
    }

    pub fn with_config(client: Arc<dyn PostClient>, config: PosterConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    /// Post `segments` in order, each replying to the one before.
    ///
    /// Returns the id of the first post, or `None` for an empty thread. A
    /// segment that fails every attempt aborts the whole thread.
    pub async fn post_thread(&self, segments: &[String]) -> Result<Option<String>, PostThreadError> {
        let total = segments.len();
        let mut posted_ids: Vec<String> = Vec::with_capacity(total);

        for (idx, text) in segments.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.config.pacing).await;
            }

            let parent = posted_ids.last().map(String::as_str);
            match self.post_with_retry(idx, text, parent).await {
                Ok(post) => {
                    tracing::info!("Posted segment {}/{} (id {})", idx + 1, total, post.id);
                    posted_ids.push(post.id);
                }
                Err((attempts, source)) => {
                    return Err(PostThreadError {
                        segment: idx,
                        total,
                        attempts,
                        posted_ids,
                        source,
                    });
                }
            }
        }

        Ok(posted_ids.into_iter().next())
    }

    async fn post_with_retry(
        &self,
        idx: usize,
        text: &str,
        parent: Option<&str>,
    ) -> Result<CreatedPost, (u32, PostError)> {
        let mut attempt: u32 = 0;
        loop {
            match self.client.create_post(text, parent).await {
                Ok(post) => return Ok(post),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.config.max_attempts {
                        return Err((attempt, e));
                    }
                    let delay = self.delay_after(attempt - 1, &e);
                    tracing::warn!(
                        "Segment {} attempt {}/{} failed: {}; retrying in {:?}",
                        idx + 1,
                        attempt,
                        self.config.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn delay_after(&self, attempt_index: u32, error: &PostError) -> Duration {
        let linear = self.config.retry_delay(attempt_index);
        match error {
            PostError::RateLimited {
                reset_at: Some(reset_at),
            } => {
                let until_reset = (*reset_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                until_reset.max(linear).min(self.config.max_rate_limit_wait)
            }
            _ => linear,
        }
    }
}
