use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threadcast_bot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(
        "Starting threadcast bot (run mode {:?}, signal {:?})",
        config.run_mode(),
        config.run_mode
    );

    let outcome = threadcast_bot::run(&config).await?;

    tracing::info!(
        source = %outcome.source,
        topic = ?outcome.topic,
        "Posted {} segments",
        outcome.thread.len()
    );
    match outcome.first_post_id {
        Some(id) => println!("Thread posted. First post ID: {}", id),
        None => println!("Thread posted. First post ID: none"),
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
