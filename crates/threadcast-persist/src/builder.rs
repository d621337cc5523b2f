use std::path::PathBuf;
use std::sync::Arc;
use threadcast_types::ContentConfig;

use crate::error::{PersistError, Result};
use crate::history::{HistoryStore, JsonFileHistory};
use crate::PersistClient;

pub const DEFAULT_HISTORY_FILE: &str = "posted_log.json";
pub const DEFAULT_FALLBACK_FILE: &str = "fallback.json";

pub struct PersistClientBuilder {
    history_path: Option<PathBuf>,
    history_store: Option<Arc<dyn HistoryStore>>,
    fallback_path: PathBuf,
    content: Option<Arc<ContentConfig>>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            history_path: None,
            history_store: None,
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_FILE),
            content: None,
        }
    }

    /// Use a JSON file at `path` as the history store
    pub fn history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = Some(path.into());
        self
    }

    /// Use a custom history store instead of a file
    pub fn history_store(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history_store = Some(store);
        self
    }

    pub fn fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    pub fn content(mut self, content: Arc<ContentConfig>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn build(self) -> Result<PersistClient> {
        let history = match (self.history_store, self.history_path) {
            (Some(_), Some(_)) => {
                return Err(PersistError::Internal(
                    "history_store and history_path are mutually exclusive".to_string(),
                ))
            }
            (Some(store), None) => store,
            (None, Some(path)) => Arc::new(JsonFileHistory::new(path)) as Arc<dyn HistoryStore>,
            (None, None) => {
                Arc::new(JsonFileHistory::new(DEFAULT_HISTORY_FILE)) as Arc<dyn HistoryStore>
            }
        };
        let content = self.content.unwrap_or_default();

        Ok(PersistClient::new(history, self.fallback_path, content))
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
