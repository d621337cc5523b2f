use mockito::Matcher;
use serde_json::json;
use threadcast_social::{PostClient, PostError, XClient};

fn client(server: &mockito::ServerGuard) -> XClient {
    XClient::new("user-token").unwrap().with_base_url(server.url())
}

#[tokio::test]
async fn test_create_top_level_post() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/2/tweets")
        .match_header("authorization", "Bearer user-token")
        .match_body(Matcher::Json(json!({"text": "hello"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"id": "1840000000000000001", "text": "hello"}}"#)
        .expect(1)
        .create_async()
        .await;

    let post = client(&server).create_post("hello", None).await.unwrap();
    assert_eq!(post.id, "1840000000000000001");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_reply_post() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/2/tweets")
        .match_body(Matcher::Json(json!({
            "text": "second",
            "reply": {"in_reply_to_tweet_id": "111"}
        })))
        .with_status(201)
        .with_body(r#"{"data": {"id": "222"}}"#)
        .expect(1)
        .create_async()
        .await;

    let post = client(&server).create_post("second", Some("111")).await.unwrap();
    assert_eq!(post.id, "222");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/2/tweets")
        .with_status(403)
        .with_body(r#"{"detail": "duplicate content"}"#)
        .create_async()
        .await;

    let err = client(&server).create_post("dup", None).await.unwrap_err();
    match err {
        PostError::Api { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("duplicate"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_carries_reset_time() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/2/tweets")
        .with_status(429)
        .with_header("x-rate-limit-reset", "1730000000")
        .create_async()
        .await;

    let err = client(&server).create_post("busy", None).await.unwrap_err();
    match err {
        PostError::RateLimited { reset_at } => {
            assert_eq!(reset_at.map(|t| t.timestamp()), Some(1_730_000_000));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_success_without_id_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/2/tweets")
        .with_status(200)
        .with_body(r#"{"errors": []}"#)
        .create_async()
        .await;

    let err = client(&server).create_post("text", None).await.unwrap_err();
    assert!(matches!(err, PostError::MissingId(_)));
}
