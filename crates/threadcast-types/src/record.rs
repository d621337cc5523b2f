use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::thread::Thread;

/// Where the posted thread came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Ai,
    Fallback,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Ai => "ai",
            SourceTag::Fallback => "fallback",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the posting history.
///
/// Key names follow the on-disk log format (`time`, `source`, `tweets`,
/// `first_tweet_id`) so existing logs stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub time: String,
    pub source: SourceTag,
    #[serde(rename = "tweets")]
    pub thread: Thread,
    #[serde(rename = "first_tweet_id")]
    pub first_post_id: Option<String>,
}

impl HistoryRecord {
    pub fn new(
        at: DateTime<Utc>,
        source: SourceTag,
        thread: Thread,
        first_post_id: Option<String>,
    ) -> Self {
        Self {
            time: format_timestamp(at),
            source,
            thread,
            first_post_id,
        }
    }

    /// Record stamped with the current UTC time
    pub fn now(source: SourceTag, thread: Thread, first_post_id: Option<String>) -> Self {
        Self::new(Utc::now(), source, thread, first_post_id)
    }
}

/// ISO-8601 with microseconds and a literal `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
