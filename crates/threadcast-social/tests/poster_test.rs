use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use threadcast_social::{CreatedPost, PostClient, PostError, Poster, PosterConfig};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Call {
    text: String,
    in_reply_to: Option<String>,
    at: Instant,
}

/// Fails every attempt for the listed segment texts, succeeds otherwise
struct ScriptedClient {
    failing: Vec<String>,
    rate_limited_once: Mutex<Option<chrono::DateTime<Utc>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            rate_limited_once: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn rate_limited_until(self, reset_at: chrono::DateTime<Utc>) -> Self {
        *self.rate_limited_once.lock().unwrap() = Some(reset_at);
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostClient for ScriptedClient {
    async fn create_post(
        &self,
        text: &str,
        in_reply_to: Option<&str>,
    ) -> Result<CreatedPost, PostError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                text: text.to_string(),
                in_reply_to: in_reply_to.map(str::to_string),
                at: Instant::now(),
            });
            calls.len()
        };

        if let Some(reset_at) = self.rate_limited_once.lock().unwrap().take() {
            return Err(PostError::RateLimited {
                reset_at: Some(reset_at),
            });
        }
        if self.failing.iter().any(|f| f == text) {
            return Err(PostError::Api {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(CreatedPost {
            id: format!("id-{n}"),
        })
    }
}

fn segments() -> Vec<String> {
    (1..=5).map(|i| format!("segment {i}")).collect()
}

#[tokio::test(start_paused = true)]
async fn test_posts_linear_reply_chain() {
    let client = Arc::new(ScriptedClient::new(&[]));
    let poster = Poster::new(client.clone());

    let first = poster.post_thread(&segments()).await.unwrap();
    assert_eq!(first.as_deref(), Some("id-1"));

    let calls = client.calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[0].in_reply_to, None);
    for i in 1..5 {
        // Each reply targets the previous segment, not the first one
        assert_eq!(calls[i].in_reply_to.as_deref(), Some(format!("id-{i}").as_str()));
        assert_eq!(calls[i].text, format!("segment {}", i + 1));
        assert_eq!(calls[i].at - calls[i - 1].at, Duration::from_secs(2));
    }
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_abort_thread() {
    let client = Arc::new(ScriptedClient::new(&["segment 2"]));
    let poster = Poster::new(client.clone());

    let err = poster.post_thread(&segments()).await.unwrap_err();
    assert_eq!(err.segment, 1);
    assert_eq!(err.total, 5);
    assert_eq!(err.attempts, 3);
    assert_eq!(err.posted_ids, vec!["id-1".to_string()]);
    assert!(matches!(err.source, PostError::Api { status: 503, .. }));
    assert!(err.to_string().contains("segment 2 of 5"));

    let calls = client.calls();
    // One success, three failed attempts, nothing after
    assert_eq!(calls.len(), 4);
    assert!(calls[1..].iter().all(|c| c.text == "segment 2"));
    assert!(calls[1..].iter().all(|c| c.in_reply_to.as_deref() == Some("id-1")));
    assert_eq!(calls[2].at - calls[1].at, Duration::from_secs(2));
    assert_eq!(calls[3].at - calls[2].at, Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_recovers() {
    struct FlakyOnce {
        inner: ScriptedClient,
        failed: Mutex<bool>,
    }

    #[async_trait]
    impl PostClient for FlakyOnce {
        async fn create_post(
            &self,
            text: &str,
            in_reply_to: Option<&str>,
        ) -> Result<CreatedPost, PostError> {
            let post = self.inner.create_post(text, in_reply_to).await?;
            let mut failed = self.failed.lock().unwrap();
            if text == "segment 3" && !*failed {
                *failed = true;
                return Err(PostError::Api {
                    status: 500,
                    body: String::new(),
                });
            }
            Ok(post)
        }
    }

    let client = Arc::new(FlakyOnce {
        inner: ScriptedClient::new(&[]),
        failed: Mutex::new(false),
    });
    let poster = Poster::new(client.clone());

    let first = poster.post_thread(&segments()).await.unwrap();
    assert_eq!(first.as_deref(), Some("id-1"));
    assert_eq!(client.inner.calls().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_waits_for_reset() {
    let reset_at = Utc::now() + chrono::Duration::seconds(30);
    let client = Arc::new(ScriptedClient::new(&[]).rate_limited_until(reset_at));
    let poster = Poster::new(client.clone());

    poster.post_thread(&segments()[..1]).await.unwrap();

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    let waited = calls[1].at - calls[0].at;
    assert!(waited >= Duration::from_secs(28), "waited {:?}", waited);
    assert!(waited <= Duration::from_secs(30), "waited {:?}", waited);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_wait_is_capped() {
    let reset_at = Utc::now() + chrono::Duration::hours(2);
    let client = Arc::new(ScriptedClient::new(&[]).rate_limited_until(reset_at));
    let config = PosterConfig::new().with_max_rate_limit_wait(Duration::from_secs(60));
    let poster = Poster::with_config(client.clone(), config);

    poster.post_thread(&segments()[..1]).await.unwrap();

    let calls = client.calls();
    assert_eq!(calls[1].at - calls[0].at, Duration::from_secs(60));
}

#[tokio::test]
async fn test_empty_thread_posts_nothing() {
    let client = Arc::new(ScriptedClient::new(&[]));
    let poster = Poster::new(client.clone());

    assert_eq!(poster.post_thread(&[]).await.unwrap(), None);
    assert!(client.calls().is_empty());
}
