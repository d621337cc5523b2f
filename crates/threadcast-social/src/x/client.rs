use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::PostError;
use crate::traits::{CreatedPost, PostClient};

pub const X_API_BASE: &str = "https://api.twitter.com";

const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// HTTP client for the X API v2 `POST /2/tweets` endpoint
///
/// Authenticates with an OAuth 2.0 user-context access token. No request
/// timeout is set beyond reqwest's defaults.
pub struct XClient {
    client: Client,
    base_url: String,
}

impl XClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, PostError> {
        let access_token = access_token.into();
        if access_token.trim().is_empty() {
            return Err(PostError::Config("access token is empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token))
                .map_err(|_| PostError::Config("invalid access token format".to_string()))?,
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: X_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_body(text: &str, in_reply_to: Option<&str>) -> Value {
        let mut body = serde_json::json!({ "text": text });
        if let (Some(parent), Some(obj)) = (in_reply_to, body.as_object_mut()) {
            obj.insert(
                "reply".to_string(),
                serde_json::json!({ "in_reply_to_tweet_id": parent }),
            );
        }
        body
    }

    /// Handle API response
    async fn handle_response(&self, response: reqwest::Response) -> Result<CreatedPost, PostError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<i64>().ok())
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));
            tracing::warn!("Posting API rate limit hit, reset at {:?}", reset_at);
            return Err(PostError::RateLimited { reset_at });
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Posting API request failed: status={}, body={}", status, body);
            return Err(PostError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: CreatePostResponse =
            serde_json::from_str(&body).map_err(|_| PostError::MissingId(body.clone()))?;

        let id = match parsed.data.id {
            Value::String(id) => id,
            Value::Number(n) => n.to_string(),
            _ => return Err(PostError::MissingId(body)),
        };

        tracing::debug!("Posting API request successful: {} (id {})", status, id);
        Ok(CreatedPost { id })
    }
}

#[async_trait]
impl PostClient for XClient {
    async fn create_post(
        &self,
        text: &str,
        in_reply_to: Option<&str>,
    ) -> Result<CreatedPost, PostError> {
        let url = format!("{}/2/tweets", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&Self::build_body(text, in_reply_to))
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: Value,
}
