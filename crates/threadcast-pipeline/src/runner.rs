use anyhow::{Context, Result};
use rand::RngCore;
use std::sync::Arc;
use threadcast_persist::PersistClient;
use threadcast_social::Poster;
use threadcast_types::{HistoryRecord, SourceTag, Thread};

use crate::builder::PipelineBuilder;
use crate::config::PipelineConfig;
use crate::selector::{ContentSelector, RunMode};

/// Result of one successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub source: SourceTag,
    pub thread: Thread,
    pub first_post_id: Option<String>,
    pub topic: Option<String>,
}

/// One scheduled job: select content, post it, record it
pub struct Pipeline {
    selector: ContentSelector,
    poster: Poster,
    persist: Arc<PersistClient>,
    config: PipelineConfig,
    rng: Box<dyn RngCore + Send>,
}

impl Pipeline {
    pub(crate) fn new(
        selector: ContentSelector,
        poster: Poster,
        persist: Arc<PersistClient>,
        config: PipelineConfig,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        Self {
            selector,
            poster,
            persist,
            config,
            rng,
        }
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Map a raw run-mode signal to a [`RunMode`] using the configured evening schedule
    pub fn mode_for(&self, signal: &str) -> RunMode {
        RunMode::from_signal(signal, &self.config.evening_schedule)
    }

    /// Run once for the given run-mode signal
    pub async fn run_signal(&mut self, signal: &str) -> Result<RunOutcome> {
        let mode = self.mode_for(signal);
        self.run(mode).await
    }

    /// Execute a full run.
    ///
    /// A posting failure aborts the run before anything is recorded, so a
    /// partially posted thread never reaches the history.
    pub async fn run(&mut self, mode: RunMode) -> Result<RunOutcome> {
        tracing::info!("Starting {:?} run", mode);

        let pool = self.persist.load_pool().await;
        let selection = self.selector.select(mode, &pool, &mut self.rng).await;
        tracing::info!(
            "Selected {} thread with {} segments",
            selection.source,
            selection.thread.len()
        );

        let first_post_id = match self.poster.post_thread(selection.thread.segments()).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(
                    segment = e.segment + 1,
                    posted_ids = ?e.posted_ids,
                    "Thread posting aborted: {}",
                    e
                );
                return Err(e).context("Failed to post thread");
            }
        };

        let record = HistoryRecord::now(
            selection.source,
            selection.thread.clone(),
            first_post_id.clone(),
        );
        self.persist
            .append(record)
            .await
            .context("Failed to append history record")?;

        tracing::info!("Run finished, first post id {:?}", first_post_id);

        Ok(RunOutcome {
            source: selection.source,
            thread: selection.thread,
            first_post_id,
            topic: selection.topic,
        })
    }
}
