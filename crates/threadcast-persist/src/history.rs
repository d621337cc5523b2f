use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use threadcast_types::{HistoryRecord, SourceTag, Thread};
use tokio::sync::Mutex;

use crate::error::{PersistError, Result};
use crate::fallback::FallbackPool;

/// Append-only record of posted threads
///
/// `load` never fails: a missing or unreadable history counts as empty,
/// and entries that are not valid records are skipped.
/// There is no locking; concurrent writers race and the last one wins.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All records in append order
    async fn load(&self) -> Vec<HistoryRecord>;

    /// Append one record, rewriting the stored history
    async fn append(&self, record: HistoryRecord) -> Result<()>;
}

/// History persisted as one pretty-printed JSON array
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw history entries; a missing file is an empty history.
    ///
    /// Entries are kept as plain JSON so records this version cannot
    /// interpret still survive a rewrite.
    pub async fn try_load_entries(&self) -> Result<Vec<Value>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value: Value = serde_json::from_str(&raw).map_err(|source| PersistError::Json {
            path: self.path.clone(),
            source,
        })?;
        match value {
            Value::Array(entries) => Ok(entries),
            _ => Err(PersistError::InvalidFormat(format!(
                "{} is not a JSON array",
                self.path.display()
            ))),
        }
    }

    /// Read the history file, skipping entries that are not valid records
    pub async fn try_load(&self) -> Result<Vec<HistoryRecord>> {
        let entries = self.try_load_entries().await?;
        let total = entries.len();

        let records: Vec<HistoryRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping history entry {} in {}: {}",
                        idx,
                        self.path.display(),
                        e
                    );
                    None
                }
            })
            .collect();

        if records.len() < total {
            tracing::debug!("Read {} of {} history entries", records.len(), total);
        }
        Ok(records)
    }

    async fn write_all(&self, entries: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|source| PersistError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write next to the target, then swap it in
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json)
            .await
            .map_err(|source| PersistError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| PersistError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistory {
    async fn load(&self) -> Vec<HistoryRecord> {
        match self.try_load().await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!("Ignoring unreadable history: {}", e);
                Vec::new()
            }
        }
    }

    async fn append(&self, record: HistoryRecord) -> Result<()> {
        let mut entries = match self.try_load_entries().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Starting a new history, existing one unreadable: {}", e);
                Vec::new()
            }
        };

        let entry = serde_json::to_value(&record).map_err(|source| PersistError::Json {
            path: self.path.clone(),
            source,
        })?;
        entries.push(entry);
        self.write_all(&entries).await?;
        tracing::debug!(
            "History now holds {} entries ({})",
            entries.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory history, used where no file should be touched
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

#[async_trait]
impl HistoryStore for MemoryHistory {
    async fn load(&self) -> Vec<HistoryRecord> {
        self.records.lock().await.clone()
    }

    async fn append(&self, record: HistoryRecord) -> Result<()> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

/// Choose a fallback thread not yet posted from the fallback source.
///
/// Once every pool thread has been used, any pool thread may repeat.
pub fn select_unused<'a, R: Rng + ?Sized>(
    history: &[HistoryRecord],
    pool: &'a FallbackPool,
    rng: &mut R,
) -> &'a Thread {
    let used: HashSet<&Thread> = history
        .iter()
        .filter(|record| record.source == SourceTag::Fallback)
        .map(|record| &record.thread)
        .collect();

    let unused: Vec<&Thread> = pool
        .threads()
        .iter()
        .filter(|thread| !used.contains(thread))
        .collect();

    if unused.is_empty() {
        tracing::info!("All {} fallback threads used, allowing repeats", pool.len());
        pool.choose(rng)
    } else {
        unused[rng.gen_range(0..unused.len())]
    }
}

/// Load the history from `store` and pick an unused fallback thread
pub async fn pick_unused_fallback<R: Rng + ?Sized>(
    store: &dyn HistoryStore,
    pool: &FallbackPool,
    rng: &mut R,
) -> Thread {
    let history = store.load().await;
    select_unused(&history, pool, rng).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn thread(tag: &str) -> Thread {
        Thread::new((1..=5).map(|i| format!("{tag} {i}")).collect())
    }

    fn record(source: SourceTag, thread: Thread) -> HistoryRecord {
        HistoryRecord::now(source, thread, Some("1".to_string()))
    }

    #[test]
    fn test_select_skips_used_fallbacks() {
        let pool = FallbackPool::new(vec![thread("a"), thread("b"), thread("c")]).unwrap();
        let history = vec![
            record(SourceTag::Fallback, thread("a")),
            record(SourceTag::Fallback, thread("c")),
        ];

        for seed in 0..25 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(select_unused(&history, &pool, &mut rng), &thread("b"));
        }
    }

    #[test]
    fn test_select_ignores_ai_records() {
        let pool = FallbackPool::new(vec![thread("a")]).unwrap();
        // Same segments, but posted as generated content
        let history = vec![record(SourceTag::Ai, thread("a"))];

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_unused(&history, &pool, &mut rng), &thread("a"));
    }

    #[test]
    fn test_select_allows_repeats_once_exhausted() {
        let pool = FallbackPool::new(vec![thread("a"), thread("b")]).unwrap();
        let history = vec![
            record(SourceTag::Fallback, thread("a")),
            record(SourceTag::Fallback, thread("b")),
        ];

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert!(pool.contains(select_unused(&history, &pool, &mut rng)));
        }
    }

    #[test]
    fn test_select_is_deterministic_for_seed() {
        let pool = FallbackPool::new(vec![thread("a"), thread("b"), thread("c")]).unwrap();
        let first = select_unused(&[], &pool, &mut StdRng::seed_from_u64(42)).clone();
        let second = select_unused(&[], &pool, &mut StdRng::seed_from_u64(42)).clone();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_memory_history_appends_in_order() {
        let store = MemoryHistory::new();
        store.append(record(SourceTag::Ai, thread("a"))).await.unwrap();
        store.append(record(SourceTag::Fallback, thread("b"))).await.unwrap();

        let history = store.load().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].thread, thread("a"));
        assert_eq!(history[1].source, SourceTag::Fallback);
    }

    #[tokio::test]
    async fn test_pick_unused_fallback_reads_store() {
        let pool = FallbackPool::new(vec![thread("a"), thread("b")]).unwrap();
        let store = MemoryHistory::with_records(vec![record(SourceTag::Fallback, thread("b"))]);

        let mut rng = StdRng::seed_from_u64(9);
        let chosen = pick_unused_fallback(&store, &pool, &mut rng).await;
        assert_eq!(chosen, thread("a"));
    }
}
