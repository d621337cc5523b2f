use serde::{Deserialize, Serialize};

/// Schedule expression of the evening run, which always posts a fallback thread
pub const EVENING_SCHEDULE: &str = "0 20 * * *";

pub const DEFAULT_MODEL: &str = "google/flan-t5-base";
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    pub max_new_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_max_new_tokens(mut self, tokens: u32) -> Self {
        self.max_new_tokens = tokens;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub evening_schedule: String,
    pub generation: GenerationSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            evening_schedule: EVENING_SCHEDULE.to_string(),
            generation: GenerationSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_evening_schedule(mut self, schedule: impl Into<String>) -> Self {
        self.evening_schedule = schedule.into();
        self
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }
}
