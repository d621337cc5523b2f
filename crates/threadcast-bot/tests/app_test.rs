use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use threadcast_bot::{build_pipeline, Config};
use threadcast_pipeline::{RunMode, SourceTag};

fn write_config(dir: &Path, extra: &str) -> Config {
    let fallback = dir.join("fallback.json");
    std::fs::write(
        &fallback,
        json!([["Evening one", "Evening two"], ["Night one", "Night two"]]).to_string(),
    )
    .unwrap();

    let toml = format!(
        r#"
        [storage]
        fallback_path = "{}"
        history_path = "{}"

        [poster]
        retry_base_secs = 0
        retry_step_secs = 0
        pacing_secs = 0

        {}
        "#,
        fallback.display(),
        dir.join("posted_log.json").display(),
        extra
    );
    let path = dir.join("threadcast.toml");
    std::fs::write(&path, toml).unwrap();

    Config::from_file(&path).unwrap()
}

fn read_log(dir: &Path) -> Vec<Value> {
    let raw = std::fs::read_to_string(dir.join("posted_log.json")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_dry_run_evening_records_history() {
    let dir = TempDir::new().unwrap();
    let mut config = write_config(dir.path(), "[social]\ndry_run = true");
    config
        .apply_env(|key| (key == "RUN_MODE").then(|| "0 20 * * *".to_string()))
        .unwrap();
    assert_eq!(config.run_mode(), RunMode::Evening);

    let outcome = threadcast_bot::run(&config).await.unwrap();
    assert_eq!(outcome.source, SourceTag::Fallback);
    assert_eq!(outcome.thread.len(), 2);

    let log = read_log(dir.path());
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["source"], "fallback");
    assert_eq!(log[0]["tweets"][0], outcome.thread.segments()[0]);
    assert!(log[0]["first_tweet_id"].as_str().unwrap().starts_with("dry-run-"));
    assert!(log[0]["time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_generative_run_against_mock_backends() {
    let mut server = mockito::Server::new_async().await;
    let hf = server
        .mock("POST", "/models/google/flan-t5-base")
        .match_header("authorization", "Bearer hf-key")
        .with_status(200)
        .with_body(json!([{"generated_text": "1. One\n2. Two\n3. Three\n4. Four\n5. Five"}]).to_string())
        .expect(1)
        .create_async()
        .await;
    let x = server
        .mock("POST", "/2/tweets")
        .match_header("authorization", "Bearer x-token")
        .with_status(201)
        .with_body(r#"{"data": {"id": "555"}}"#)
        .expect(5)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let extra = format!(
        "[llm]\nbase_url = \"{url}\"\n\n[social]\nbase_url = \"{url}\"",
        url = server.url()
    );
    let mut config = write_config(dir.path(), &extra);
    config
        .apply_env(|key| match key {
            "HF_API_KEY" => Some("hf-key".to_string()),
            "TWITTER_OAUTH2_TOKEN" => Some("x-token".to_string()),
            _ => None,
        })
        .unwrap();

    let mut pipeline = build_pipeline(&config).unwrap();
    let outcome = pipeline.run(config.run_mode()).await.unwrap();

    assert_eq!(outcome.source, SourceTag::Ai);
    assert_eq!(outcome.first_post_id.as_deref(), Some("555"));
    assert_eq!(read_log(dir.path())[0]["source"], "ai");

    hf.assert_async().await;
    x.assert_async().await;
}

#[test]
fn test_missing_post_token_fails_wiring() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    // Secrets were never applied, so the posting client has no token
    let err = build_pipeline(&config).err().unwrap();
    assert!(format!("{:#}", err).contains("access token is empty"));
}

#[tokio::test]
async fn test_missing_hf_key_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let hf = server
        .mock("POST", "/models/google/flan-t5-base")
        .with_status(401)
        .with_body(r#"{"error": "Invalid credentials in Authorization header"}"#)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let extra = format!(
        "[llm]\nbase_url = \"{}\"\n\n[social]\ndry_run = true",
        server.url()
    );
    let mut config = write_config(dir.path(), &extra);
    config
        .apply_env(|key| (key == "RUN_MODE").then(|| "0 8 * * *".to_string()))
        .unwrap();
    assert!(config.hf_api_key.is_none());
    assert_eq!(config.run_mode(), RunMode::Generative);

    let outcome = threadcast_bot::run(&config).await.unwrap();
    assert_eq!(outcome.source, SourceTag::Fallback);
    assert_eq!(read_log(dir.path())[0]["source"], "fallback");

    hf.assert_async().await;
}
