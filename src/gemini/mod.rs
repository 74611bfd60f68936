//! Upstream generative-language client.
//!
//! Thin typed wrapper over `POST {base}/models/{model}:generateContent`.
//! The full upstream payload is kept as raw JSON for diagnostics; the useful
//! text is the concatenation of the first candidate's text parts.
//!
//! The base URL is configurable so tests (and self-hosted gateways) can point
//! the client somewhere else.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GeminiError {
    /// No credential configured — request-fatal, never a startup crash.
    #[error("GEMINI_API_KEY is not configured on the server")]
    MissingApiKey,
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// A successful generateContent exchange: the extracted text (if the first
/// candidate carried any) plus the untouched upstream payload.
#[derive(Debug)]
pub struct Generated {
    pub text: Option<String>,
    pub raw: Value,
}

// ─── Client ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, GeminiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Forward a prompt as a single user-role message and await the reply.
    ///
    /// Non-2xx upstream statuses are surfaced as [`GeminiError::Upstream`]
    /// rather than re-serialized as an empty success.
    pub async fn generate(&self, prompt: &str) -> Result<Generated, GeminiError> {
        let key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, key
        );

        let body = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GeminiError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = resp.json().await?;
        let text = extract_text(&raw);
        Ok(Generated { text, raw })
    }
}

/// Concatenate the text fragments of the first candidate's content parts.
/// `None` when the payload carries no fragments at all.
pub fn extract_text(raw: &Value) -> Option<String> {
    let parts = raw
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let fragments: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if fragments.is_empty() {
        None
    } else {
        Some(fragments.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn concatenates_first_candidate_parts() {
        let raw = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "Hi" }, { "text": " there" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        });
        assert_eq!(extract_text(&raw).as_deref(), Some("Hi there"));
    }

    #[test]
    fn no_candidates_yields_none() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn partless_candidate_yields_none() {
        let raw = json!({
            "candidates": [ { "content": { "parts": [] } } ]
        });
        assert_eq!(extract_text(&raw), None);

        let raw = json!({
            "candidates": [ { "content": { "parts": [ { "inlineData": {} } ] } } ]
        });
        assert_eq!(extract_text(&raw), None);
    }
}
