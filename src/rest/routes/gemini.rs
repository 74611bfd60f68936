// rest/routes/gemini.rs — the enhancement proxy.
//
// Shields the server-side credential from the browser and normalizes the
// upstream response shape to { text, raw }. No retries, no caching.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use crate::gemini::GeminiError;
use crate::AppContext;

pub async fn enhance(
    State(ctx): State<Arc<AppContext>>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // The body is taken raw so an absent body, malformed JSON, or a
    // non-string prompt all collapse to the same 400 the client expects,
    // instead of an extractor rejection with a different shape.
    let parsed: Option<Value> = serde_json::from_slice(&body).ok();
    let prompt = parsed
        .as_ref()
        .and_then(|v| v.get("prompt"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let Some(prompt) = prompt else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing prompt" })),
        ));
    };

    if !ctx.gemini.has_api_key() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Missing GEMINI_API_KEY on server" })),
        ));
    }

    match ctx.gemini.generate(prompt).await {
        Ok(generated) => Ok(Json(json!({
            "text": generated.text,
            "raw": generated.raw,
        }))),
        Err(e @ GeminiError::MissingApiKey) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
        Err(e) => {
            warn!(err = %e, "enhancement proxy call failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}
