//! REST tests for the memory collection: seeding, create/delete, and the
//! persistence round-trip across a server restart.

use std::path::Path;
use std::sync::Arc;

use memboxd::{config::BoxConfig, rest, AppContext};
use serde_json::json;
use tempfile::TempDir;

fn test_config(data_dir: &Path) -> BoxConfig {
    BoxConfig {
        port: 0,
        bind_address: "127.0.0.1".to_string(),
        data_dir: data_dir.to_path_buf(),
        log: "error".to_string(),
        log_format: "pretty".to_string(),
        assets_dir: None,
        gemini_api_key: None,
        gemini_api_url: "http://127.0.0.1:9".to_string(),
        gemini_model: "gemini-1.5-flash".to_string(),
        gemini_timeout_secs: 5,
    }
}

async fn spawn_app(data_dir: &Path) -> String {
    let ctx: Arc<AppContext> = AppContext::init(test_config(data_dir)).await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = rest::build_router(ctx);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn fresh_box_serves_the_two_seed_records() {
    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path()).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/api/memories"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let memories = body["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 2);
    assert_eq!(memories[0]["type"], "letter");
    assert_eq!(memories[0]["author"], "Alex");
    assert_eq!(memories[1]["type"], "photo");
    assert!(memories[1].get("content").is_none());
}

#[tokio::test]
async fn created_memory_lands_first_and_defaults_author() {
    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/memories"))
        .json(&json!({
            "type": "letter",
            "title": "Anniversary",
            "content": "Three years already."
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let created: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(created["author"], "Us");
    assert!(created["id"].is_string());

    let body: serde_json::Value = reqwest::get(format!("{base}/api/memories"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let memories = body["memories"].as_array().unwrap();
    assert_eq!(memories.len(), 3);
    assert_eq!(memories[0]["title"], "Anniversary");
}

#[tokio::test]
async fn invalid_memory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path()).await;

    // A photo without an upload is a user-input validation error.
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/memories"))
        .json(&json!({ "type": "photo", "title": "Missing file" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("photo"));
}

#[tokio::test]
async fn delete_then_miss_gets_404() {
    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();

    // Seed record "1" is the letter.
    let resp = client
        .delete(format!("{base}/api/memories/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .delete(format!("{base}/api/memories/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(format!("{base}/api/memories/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn collection_survives_a_restart_intact() {
    let dir = TempDir::new().unwrap();

    let base = spawn_app(dir.path()).await;
    let client = reqwest::Client::new();
    client
        .post(format!("{base}/api/memories"))
        .json(&json!({
            "type": "video",
            "title": "First dance",
            "url": "data:video/mp4;base64,AAAA",
            "author": "Jordan"
        }))
        .send()
        .await
        .unwrap();
    let before: serde_json::Value = reqwest::get(format!("{base}/api/memories"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // Same data dir, fresh process state.
    let base2 = spawn_app(dir.path()).await;
    let after: serde_json::Value = reqwest::get(format!("{base2}/api/memories"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(before, after, "order and fields must survive a reload");
    assert_eq!(after["memories"][0]["title"], "First dance");
}

#[tokio::test]
async fn health_reports_status_and_count() {
    let dir = TempDir::new().unwrap();
    let base = spawn_app(dir.path()).await;

    let body: serde_json::Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["memories"], 2);
}
