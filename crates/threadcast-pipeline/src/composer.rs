//! Turns generated text into a postable thread.
//!
//! Every composed thread has exactly [`Thread::SEGMENTS`] segments, each no
//! longer than the configured maximum, and its last segment carries the CTA
//! and, when they fit, a few hashtags.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use threadcast_types::{ContentConfig, Thread};

pub const ELLIPSIS: char = '…';

/// Characters removed from the front of a numbered line ("1. ", "2) ", "3 - ")
const ORDINAL_CHARS: &[char] = &['1', '2', '3', '4', '5', ')', '.', ' ', '-'];

/// Every Unicode line boundary, not only `\n` and `\r\n`
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Fit `text` into `max_len` characters.
///
/// Text that already fits is only trimmed. Longer text is cut to
/// `max_len - 1` characters, backed off to the last space in that window,
/// and ends with an ellipsis.
pub fn clamp_segment(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.trim().to_string();
    }

    let cut: String = text.chars().take(max_len.saturating_sub(1)).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };

    format!("{}{}", cut, ELLIPSIS).trim().to_string()
}

fn strip_ordinal(line: &str) -> &str {
    if line.starts_with(|c: char| c.is_ascii_digit()) {
        line.trim_start_matches(ORDINAL_CHARS)
    } else {
        line
    }
}

/// Pick 2-3 distinct tags from one randomly chosen bucket, space-joined
pub fn pick_hashtags<R: Rng + ?Sized>(content: &ContentConfig, rng: &mut R) -> String {
    let Some(bucket) = content.hashtag_buckets.choose(rng) else {
        return String::new();
    };

    let count = if content.min_hashtags >= content.max_hashtags {
        content.min_hashtags
    } else {
        rng.gen_range(content.min_hashtags..=content.max_hashtags)
    }
    .min(bucket.len());

    let mut tags = bucket.clone();
    let (picked, _) = tags.partial_shuffle(rng, count);
    picked.join(" ")
}

pub fn build_prompt(topic: &str, content: &ContentConfig) -> String {
    format!(
        "Write a {parts}-part Twitter thread about \"{topic}\" for non-technical users.\n\
         Rules:\n\
         - Each tweet <= {max} characters.\n\
         - Include causes, human mistakes, and clear tips.\n\
         - End with: \"{cta}\" and {min_tags}-{max_tags} hashtags.\n\
         Output format: list tweets 1-{parts}, each on its own line.\n",
        parts = Thread::SEGMENTS,
        topic = topic,
        max = content.max_segment_len,
        cta = content.cta,
        min_tags = content.min_hashtags,
        max_tags = content.max_hashtags,
    )
}

pub struct ThreadComposer {
    content: Arc<ContentConfig>,
}

impl ThreadComposer {
    pub fn new(content: Arc<ContentConfig>) -> Self {
        Self { content }
    }

    pub fn content(&self) -> &ContentConfig {
        &self.content
    }

    /// Build a thread from a raw generated text blob
    pub fn compose_generated<R: Rng + ?Sized>(&self, raw: &str, rng: &mut R) -> Thread {
        let max = self.content.max_segment_len;

        let mut segments: Vec<String> = raw
            .split(LINE_BREAKS)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(strip_ordinal)
            .filter(|line| !line.is_empty())
            .map(|line| clamp_segment(line, max))
            .take(Thread::SEGMENTS)
            .collect();

        while segments.len() < Thread::SEGMENTS {
            segments.push(clamp_segment(&self.content.filler, max));
        }

        let hashtags = pick_hashtags(&self.content, rng);
        if let Some(last) = segments.last_mut() {
            *last = self.finish_last(last, &hashtags);
        }

        Thread::new(segments)
    }

    /// Fallback threads are posted exactly as stored
    pub fn compose_fallback(&self, thread: Thread) -> Thread {
        thread
    }

    // CTA first, then hashtags only if they still fit
    fn finish_last(&self, last: &str, hashtags: &str) -> String {
        let max = self.content.max_segment_len;
        let mut last = last.to_string();

        if !last.contains(&self.content.cta) {
            last = clamp_segment(&format!("{} {}", last, self.content.cta), max);
        }

        if last.chars().count() + 1 + hashtags.chars().count() <= max {
            last = format!("{} {}", last, hashtags);
        }

        clamp_segment(&last, max)
    }
}
