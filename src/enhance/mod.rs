//! Client-side enhancement call.
//!
//! Wraps `POST /api/gemini` for embedders the same way the web client wraps
//! it: a draft letter goes in, the polished letter comes out, and any failure
//! quietly degrades to the original draft. The AI touch-up is an optional
//! nicety, never a blocking error.

use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Stateless proxy-endpoint client. One request per call; callers that need
/// re-entry protection (the UI's "enhancing…" flag) gate it themselves.
#[derive(Clone)]
pub struct EnhanceClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    prompt: &'a str,
}

impl EnhanceClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:4400`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Send a prompt through the proxy and return the extracted text.
    /// A reply without text degrades to the empty string.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/gemini", self.base_url);
        let resp = self.http.post(&url).json(&AskRequest { prompt }).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let msg = resp
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| "Gemini request failed".to_string());
            return Err(anyhow!("{msg} (status {status})"));
        }

        let data: Value = resp.json().await?;
        Ok(data
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Polish a draft letter. An empty draft is returned unchanged without a
    /// network call; any failure is logged and the original draft returned.
    pub async fn enhance_letter(&self, letter: &str) -> String {
        if letter.is_empty() {
            return letter.to_string();
        }

        match self.ask(&letter_prompt(letter)).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("enhancement returned no text — keeping the original letter");
                letter.to_string()
            }
            Err(e) => {
                warn!(err = %e, "letter enhancement failed — keeping the original letter");
                letter.to_string()
            }
        }
    }
}

/// The letter-improvement prompt the box has always used.
pub fn letter_prompt(letter: &str) -> String {
    format!(
        "You are helping improve a romantic love letter.\n\
         Rewrite the letter to be warmer, clearer, and more natural.\n\
         Keep the meaning. Do not add explicit content.\n\
         Return only the improved letter.\n\
         \n\
         LETTER:\n\
         {letter}"
    )
}
