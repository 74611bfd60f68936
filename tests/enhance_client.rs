//! Behavior of the client-side enhancement wrapper: the AI touch-up must
//! never block or lose a draft.

use std::path::Path;
use std::sync::Arc;

use memboxd::enhance::EnhanceClient;
use memboxd::{config::BoxConfig, rest, AppContext};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_app(data_dir: &Path, gemini_url: &str, api_key: Option<&str>) -> String {
    let config = BoxConfig {
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        data_dir: data_dir.to_path_buf(),
        log: "error".to_string(),
        log_format: "pretty".to_string(),
        assets_dir: None,
        gemini_api_key: api_key.map(String::from),
        gemini_api_url: gemini_url.to_string(),
        gemini_model: "gemini-1.5-flash".to_string(),
        gemini_timeout_secs: 5,
    };
    let ctx: Arc<AppContext> = AppContext::init(config).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = rest::build_router(ctx);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn empty_draft_is_returned_unchanged_without_a_call() {
    // Nothing listens here — an empty draft must short-circuit before the network.
    let client = EnhanceClient::new("http://127.0.0.1:9").unwrap();
    assert_eq!(client.enhance_letter("").await, "");
}

#[tokio::test]
async fn unreachable_proxy_falls_back_to_the_draft() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = EnhanceClient::new(format!("http://127.0.0.1:{port}")).unwrap();
    assert_eq!(client.enhance_letter("my rough draft").await, "my rough draft");
}

#[tokio::test]
async fn proxy_error_falls_back_to_the_draft() {
    // Server up, credential missing — the proxy answers 500, the client degrades.
    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path(), "http://127.0.0.1:9", None).await;

    let client = EnhanceClient::new(base).unwrap();
    assert_eq!(client.enhance_letter("my rough draft").await, "my rough draft");
}

#[tokio::test]
async fn successful_enhancement_returns_the_polished_letter() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .and(body_string_contains("LETTER:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "A warmer letter." } ] } }
            ]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path(), &upstream.uri(), Some("k")).await;

    let client = EnhanceClient::new(base).unwrap();
    assert_eq!(client.enhance_letter("my rough draft").await, "A warmer letter.");
}
