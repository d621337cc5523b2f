use rand::Rng;
use serde_json::Value;
use std::path::Path;
use threadcast_types::{ContentConfig, Thread};

use crate::error::{PersistError, Result};

/// Pre-written threads available when generation is skipped or fails.
///
/// Never empty: every constructor either rejects an empty set or falls back
/// to the built-in default thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackPool {
    threads: Vec<Thread>,
}

impl FallbackPool {
    pub fn new(threads: Vec<Thread>) -> Result<Self> {
        if threads.is_empty() {
            return Err(PersistError::EmptyPool);
        }
        Ok(Self { threads })
    }

    /// Single-thread pool holding the configured default thread
    pub fn default_for(content: &ContentConfig) -> Self {
        Self {
            threads: vec![content.default_thread()],
        }
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn contains(&self, thread: &Thread) -> bool {
        self.threads.contains(thread)
    }

    /// Uniform choice over the whole pool
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Thread {
        &self.threads[rng.gen_range(0..self.threads.len())]
    }
}

/// Parse a fallback document: an array whose every element is an array.
///
/// String entries are kept verbatim; any other JSON value is rendered as its
/// JSON text.
pub fn parse_pool(raw: &str, path: &Path) -> Result<FallbackPool> {
    let value: Value = serde_json::from_str(raw).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(entries) = value else {
        return Err(PersistError::InvalidFormat(
            "top level is not an array".to_string(),
        ));
    };

    let threads = entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| match entry {
            Value::Array(segments) => Ok(Thread::new(
                segments
                    .into_iter()
                    .map(|segment| match segment {
                        Value::String(text) => text,
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            _ => Err(PersistError::InvalidFormat(format!(
                "entry {} is not an array",
                idx
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    FallbackPool::new(threads)
}

/// Load the fallback pool, reporting every failure mode
pub async fn try_load_pool(path: impl AsRef<Path>) -> Result<FallbackPool> {
    let path = path.as_ref();
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PersistError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(PersistError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    parse_pool(&raw, path)
}

/// Load the fallback pool, degrading to the default thread on any failure
pub async fn load_pool(path: impl AsRef<Path>, content: &ContentConfig) -> FallbackPool {
    let path = path.as_ref();
    match try_load_pool(path).await {
        Ok(pool) => {
            tracing::debug!("Loaded {} fallback threads from {}", pool.len(), path.display());
            pool
        }
        Err(e) => {
            tracing::warn!("Failed to load {}, using default thread: {}", path.display(), e);
            FallbackPool::default_for(content)
        }
    }
}
