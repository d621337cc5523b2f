use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use threadcast_persist::{DEFAULT_FALLBACK_FILE, DEFAULT_HISTORY_FILE};
use threadcast_pipeline::config::{DEFAULT_MAX_NEW_TOKENS, DEFAULT_MODEL};
use threadcast_pipeline::{
    ContentConfig, GenerationSettings, PipelineConfig, RunMode, EVENING_SCHEDULE,
};
use threadcast_social::PosterConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub social: SocialConfig,
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
    pub poster: PosterSettings,
    pub logging: LoggingConfig,
    pub content: ContentConfig,

    // Secrets and the run signal (from ENV only)
    #[serde(skip)]
    pub hf_api_key: Option<String>,
    #[serde(skip)]
    pub twitter_oauth2_token: Option<String>,
    #[serde(skip)]
    pub run_mode: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_new_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            timeout_secs: 60,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub base_url: Option<String>,
    /// Log posts instead of sending them
    pub dry_run: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub fallback_path: PathBuf,
    pub history_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            fallback_path: PathBuf::from(DEFAULT_FALLBACK_FILE),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Run-mode signal that selects the fallback-only evening run
    pub evening_expression: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            evening_expression: EVENING_SCHEDULE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PosterSettings {
    pub max_attempts: u32,
    pub retry_base_secs: u64,
    pub retry_step_secs: u64,
    pub pacing_secs: u64,
    pub max_rate_limit_wait_secs: u64,
}

impl Default for PosterSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_base_secs: 2,
            retry_step_secs: 2,
            pacing_secs: 2,
            max_rate_limit_wait_secs: 15 * 60,
        }
    }
}

impl From<PosterSettings> for PosterConfig {
    fn from(settings: PosterSettings) -> Self {
        PosterConfig::new()
            .with_max_attempts(settings.max_attempts)
            .with_retry_backoff(
                Duration::from_secs(settings.retry_base_secs),
                Duration::from_secs(settings.retry_step_secs),
            )
            .with_pacing(Duration::from_secs(settings.pacing_secs))
            .with_max_rate_limit_wait(Duration::from_secs(settings.max_rate_limit_wait_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `json` or `pretty`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables `THREADCAST_<SECTION>__<KEY>`
    ///
    /// Secrets, `HF_MODEL` and `RUN_MODE` are read from the environment last.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("THREADCAST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        builder.build()?.try_deserialize()
    }

    /// Fill in environment-only values and check the required secrets.
    ///
    /// A missing or empty `HF_API_KEY` is not an error: the generative call
    /// is then rejected and the run falls back. `TWITTER_OAUTH2_TOKEN` is
    /// required unless `social.dry_run` is set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("HF_MODEL").filter(|m| !m.trim().is_empty()) {
            self.llm.model = model;
        }
        self.run_mode = lookup("RUN_MODE").unwrap_or_default();
        self.hf_api_key = lookup("HF_API_KEY");
        self.twitter_oauth2_token = lookup("TWITTER_OAUTH2_TOKEN");

        let token_missing = self
            .twitter_oauth2_token
            .as_deref()
            .map_or(true, |t| t.trim().is_empty());
        if token_missing && !self.social.dry_run {
            return Err(ConfigError::Message(
                "TWITTER_OAUTH2_TOKEN environment variable is required".to_string(),
            ));
        }

        Ok(())
    }

    pub fn run_mode(&self) -> RunMode {
        RunMode::from_signal(&self.run_mode, &self.schedule.evening_expression)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_evening_schedule(self.schedule.evening_expression.clone())
            .with_generation(
                GenerationSettings::new(self.llm.model.clone())
                    .with_max_new_tokens(self.llm.max_new_tokens),
            )
    }
}
