use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use threadcast_types::{ContentConfig, HistoryRecord, Thread};

use crate::builder::PersistClientBuilder;
use crate::error::Result;
use crate::fallback::{load_pool, FallbackPool};
use crate::history::{pick_unused_fallback, HistoryStore};

/// Storage handle for one run: the history store plus the fallback pool file
pub struct PersistClient {
    history: Arc<dyn HistoryStore>,
    fallback_path: PathBuf,
    content: Arc<ContentConfig>,
}

impl PersistClient {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        fallback_path: impl Into<PathBuf>,
        content: Arc<ContentConfig>,
    ) -> Self {
        Self {
            history,
            fallback_path: fallback_path.into(),
            content,
        }
    }

    pub fn builder() -> PersistClientBuilder {
        PersistClientBuilder::new()
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub fn fallback_path(&self) -> &Path {
        &self.fallback_path
    }

    /// Load the fallback pool; never fails
    pub async fn load_pool(&self) -> FallbackPool {
        load_pool(&self.fallback_path, &self.content).await
    }

    pub async fn pick_unused_fallback<R: Rng + ?Sized>(
        &self,
        pool: &FallbackPool,
        rng: &mut R,
    ) -> Thread {
        pick_unused_fallback(self.history.as_ref(), pool, rng).await
    }

    pub async fn load_history(&self) -> Vec<HistoryRecord> {
        self.history.load().await
    }

    pub async fn append(&self, record: HistoryRecord) -> Result<()> {
        self.history.append(record).await
    }
}
