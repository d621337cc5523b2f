use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use threadcast_llm::{GenerateOptions, GenerateRequest, TextGenerator};
use threadcast_persist::{FallbackPool, PersistClient};
use threadcast_types::{ContentConfig, SourceTag, Thread};

use crate::composer::{build_prompt, ThreadComposer};
use crate::config::GenerationSettings;

/// What kind of run the scheduler triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Fallback pool only, no generative call
    Evening,
    Generative,
}

impl RunMode {
    /// Interpret the run-mode signal against the evening schedule expression
    pub fn from_signal(signal: &str, evening: &str) -> Self {
        if signal.trim() == evening.trim() {
            RunMode::Evening
        } else {
            RunMode::Generative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub source: SourceTag,
    pub thread: Thread,
    /// Topic of a generative attempt, kept even when it fell back
    pub topic: Option<String>,
}

/// Chooses between a generated thread and an unused fallback thread
pub struct ContentSelector {
    generator: Arc<dyn TextGenerator>,
    persist: Arc<PersistClient>,
    composer: ThreadComposer,
    content: Arc<ContentConfig>,
    generation: GenerationSettings,
}

impl ContentSelector {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        persist: Arc<PersistClient>,
        content: Arc<ContentConfig>,
        generation: GenerationSettings,
    ) -> Self {
        Self {
            generator,
            persist,
            composer: ThreadComposer::new(content.clone()),
            content,
            generation,
        }
    }

    pub fn composer(&self) -> &ThreadComposer {
        &self.composer
    }

    pub async fn select<R: Rng + ?Sized>(
        &self,
        mode: RunMode,
        pool: &FallbackPool,
        rng: &mut R,
    ) -> Selection {
        if mode == RunMode::Evening {
            tracing::info!("Evening run, using fallback pool");
            return self.fallback(pool, rng, None).await;
        }

        let Some(topic) = self.content.topics.choose(rng).cloned() else {
            tracing::warn!("No topics configured, using fallback pool");
            return self.fallback(pool, rng, None).await;
        };

        let request = GenerateRequest::new(
            self.generation.model.clone(),
            build_prompt(&topic, &self.content),
        )
        .with_options(GenerateOptions::new().max_new_tokens(self.generation.max_new_tokens));

        tracing::info!("Generating thread about \"{}\" with {}", topic, self.generation.model);
        match self.generator.generate(request).await {
            Ok(response) => Selection {
                source: SourceTag::Ai,
                thread: self.composer.compose_generated(&response.text, rng),
                topic: Some(topic),
            },
            Err(e) => {
                tracing::warn!("AI generation failed, using fallback: {:#}", e);
                self.fallback(pool, rng, Some(topic)).await
            }
        }
    }

    async fn fallback<R: Rng + ?Sized>(
        &self,
        pool: &FallbackPool,
        rng: &mut R,
        topic: Option<String>,
    ) -> Selection {
        let thread = self.persist.pick_unused_fallback(pool, rng).await;
        Selection {
            source: SourceTag::Fallback,
            thread: self.composer.compose_fallback(thread),
            topic,
        }
    }
}
