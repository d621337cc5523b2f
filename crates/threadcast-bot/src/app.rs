use anyhow::{Context, Result};
use std::sync::Arc;

use threadcast_llm::{ClientFactory, HuggingFaceConfig, ProviderConfig, TextGenerator};
use threadcast_persist::PersistClient;
use threadcast_pipeline::{Pipeline, PipelineBuilder, RunOutcome};
use threadcast_social::{DryRunClient, PostClient, XClient};

use crate::config::Config;

fn build_generator(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    let mut hf = HuggingFaceConfig::new(config.hf_api_key.clone().unwrap_or_default())
        .with_timeout_secs(config.llm.timeout_secs);
    if let Some(base_url) = &config.llm.base_url {
        hf = hf.with_base_url(base_url.clone());
    }

    ClientFactory::create_generator(ProviderConfig::from_huggingface(hf))
}

fn build_post_client(config: &Config) -> Result<Arc<dyn PostClient>> {
    if config.social.dry_run {
        tracing::info!("Dry run enabled, posts will only be logged");
        return Ok(Arc::new(DryRunClient::new()));
    }

    let token = config.twitter_oauth2_token.clone().unwrap_or_default();
    let mut client = XClient::new(token).context("Failed to create posting client")?;
    if let Some(base_url) = &config.social.base_url {
        client = client.with_base_url(base_url.clone());
    }
    Ok(Arc::new(client))
}

/// Wire every component described by `config` into a ready pipeline
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let content = Arc::new(config.content.clone());

    let persist = PersistClient::builder()
        .history_path(&config.storage.history_path)
        .fallback_path(&config.storage.fallback_path)
        .content(content.clone())
        .build()
        .context("Failed to create storage client")?;

    PipelineBuilder::new()
        .generator(build_generator(config)?)
        .post_client(build_post_client(config)?)
        .persist(Arc::new(persist))
        .content(content)
        .poster_config(config.poster.clone().into())
        .config(config.pipeline_config())
        .build()
}

/// Run one scheduled job for the configured run mode
pub async fn run(config: &Config) -> Result<RunOutcome> {
    let mut pipeline = build_pipeline(config)?;
    pipeline.run(config.run_mode()).await
}
