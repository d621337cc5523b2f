use serde::{Deserialize, Serialize};

/// An ordered chain of post segments.
///
/// Composed threads always hold exactly [`Thread::SEGMENTS`] segments.
/// Threads taken from the fallback pool are kept exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thread {
    segments: Vec<String>,
}

impl Thread {
    /// Number of segments in a composed thread
    pub const SEGMENTS: usize = 5;

    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl<'a> From<&[&'a str]> for Thread {
    fn from(segments: &[&'a str]) -> Self {
        Self::new(segments.iter().map(|s| s.to_string()).collect())
    }
}
