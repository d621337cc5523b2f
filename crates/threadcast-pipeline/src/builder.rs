use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;

use threadcast_llm::TextGenerator;
use threadcast_persist::PersistClient;
use threadcast_social::{PostClient, Poster, PosterConfig};
use threadcast_types::ContentConfig;

use crate::config::PipelineConfig;
use crate::runner::Pipeline;
use crate::selector::ContentSelector;

/// Builder for constructing a [`Pipeline`]
pub struct PipelineBuilder {
    generator: Option<Arc<dyn TextGenerator>>,
    post_client: Option<Arc<dyn PostClient>>,
    persist: Option<Arc<PersistClient>>,
    content: Arc<ContentConfig>,
    poster_config: PosterConfig,
    config: PipelineConfig,
    rng: Option<Box<dyn RngCore + Send>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            generator: None,
            post_client: None,
            persist: None,
            content: Arc::new(ContentConfig::default()),
            poster_config: PosterConfig::default(),
            config: PipelineConfig::default(),
            rng: None,
        }
    }

    /// Set the generative text backend
    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the posting backend
    pub fn post_client(mut self, client: Arc<dyn PostClient>) -> Self {
        self.post_client = Some(client);
        self
    }

    pub fn persist(mut self, persist: Arc<PersistClient>) -> Self {
        self.persist = Some(persist);
        self
    }

    pub fn content(mut self, content: Arc<ContentConfig>) -> Self {
        self.content = content;
        self
    }

    pub fn poster_config(mut self, config: PosterConfig) -> Self {
        self.poster_config = config;
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject the random source; defaults to an entropy-seeded `StdRng`
    pub fn rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn seed(self, seed: u64) -> Self {
        self.rng(Box::new(StdRng::seed_from_u64(seed)))
    }

    pub fn build(self) -> Result<Pipeline> {
        let generator = self
            .generator
            .ok_or_else(|| anyhow!("Text generator is required"))?;
        let post_client = self
            .post_client
            .ok_or_else(|| anyhow!("Post client is required"))?;
        let persist = self
            .persist
            .ok_or_else(|| anyhow!("Persist client is required"))?;

        self.content
            .validate()
            .map_err(|e| anyhow!("Invalid content configuration: {}", e))?;

        let selector = ContentSelector::new(
            generator,
            persist.clone(),
            self.content,
            self.config.generation.clone(),
        );
        let poster = Poster::with_config(post_client, self.poster_config);
        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_entropy()));

        Ok(Pipeline::new(selector, poster, persist, self.config, rng))
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
