use serde::{Deserialize, Serialize};

use crate::thread::Thread;

pub type HashtagBucket = Vec<String>;

pub const DEFAULT_MAX_SEGMENT_LEN: usize = 280;
pub const DEFAULT_CTA: &str = "Was this useful? Like, Share & Comment to help others stay safe.";
pub const DEFAULT_FILLER: &str = "Cybersecurity awareness matters. Stay safe online.";

const DEFAULT_TOPICS: [&str; 10] = [
    "phishing awareness",
    "ransomware basics for non-tech users",
    "password hygiene and MFA",
    "social engineering red flags",
    "mobile banking safety",
    "cloud account hardening for small teams",
    "insider threats: human factors",
    "safe software updates and patching",
    "public Wi-Fi risks and VPN basics",
    "data privacy and oversharing",
];

const DEFAULT_HASHTAG_BUCKETS: [[&str; 3]; 3] = [
    ["#CyberSecurity", "#InfoSec", "#DataPrivacy"],
    ["#CyberAwareness", "#SecurityTips", "#OnlineSafety"],
    ["#Phishing", "#Ransomware", "#Malware"],
];

const DEFAULT_THREAD: [&str; 5] = [
    "Cybersecurity awareness matters.",
    "Always double-check links before clicking.",
    "Enable MFA to protect your accounts.",
    "Keep your software updated.",
    "Was this useful? Like, Share & Comment to help others stay safe. #CyberAwareness",
];

/// Fixed content settings shared by the composer, selector and pool loader.
///
/// Every field has a default, so a partial `[content]` table only overrides
/// what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Maximum characters per segment
    pub max_segment_len: usize,
    pub cta: String,
    /// Padding used when generated text has fewer than five lines
    pub filler: String,
    pub topics: Vec<String>,
    pub hashtag_buckets: Vec<HashtagBucket>,
    pub min_hashtags: usize,
    pub max_hashtags: usize,
    /// Used when the fallback pool cannot be loaded
    pub default_thread: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_segment_len: DEFAULT_MAX_SEGMENT_LEN,
            cta: DEFAULT_CTA.to_string(),
            filler: DEFAULT_FILLER.to_string(),
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            hashtag_buckets: DEFAULT_HASHTAG_BUCKETS
                .iter()
                .map(|bucket| bucket.iter().map(|t| t.to_string()).collect())
                .collect(),
            min_hashtags: 2,
            max_hashtags: 3,
            default_thread: DEFAULT_THREAD.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ContentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_segment_len(mut self, max: usize) -> Self {
        self.max_segment_len = max;
        self
    }

    pub fn with_cta(mut self, cta: impl Into<String>) -> Self {
        self.cta = cta.into();
        self
    }

    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_hashtag_buckets(mut self, buckets: Vec<HashtagBucket>) -> Self {
        self.hashtag_buckets = buckets;
        self
    }

    pub fn default_thread(&self) -> Thread {
        Thread::new(self.default_thread.clone())
    }

    /// Check the invariants the composer relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.max_segment_len < 2 {
            return Err("max_segment_len must be at least 2".to_string());
        }
        if self.topics.is_empty() {
            return Err("at least one topic is required".to_string());
        }
        if self.hashtag_buckets.is_empty() {
            return Err("at least one hashtag bucket is required".to_string());
        }
        if self.min_hashtags == 0 || self.min_hashtags > self.max_hashtags {
            return Err(format!(
                "invalid hashtag count range {}..={}",
                self.min_hashtags, self.max_hashtags
            ));
        }
        if let Some(short) = self
            .hashtag_buckets
            .iter()
            .find(|bucket| bucket.len() < self.max_hashtags)
        {
            return Err(format!(
                "hashtag bucket {:?} has fewer than {} tags",
                short, self.max_hashtags
            ));
        }
        if self.default_thread.is_empty() {
            return Err("default_thread must not be empty".to_string());
        }
        Ok(())
    }
}
