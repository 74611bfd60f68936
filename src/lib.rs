pub mod config;
pub mod enhance;
pub mod gemini;
pub mod memory;
pub mod rest;

use std::sync::Arc;

use config::BoxConfig;
use gemini::GeminiClient;
use memory::MemoryStore;

/// Shared application state passed to every request handler.
pub struct AppContext {
    pub config: Arc<BoxConfig>,
    /// The memory collection — one JSON blob on disk, loaded at startup.
    pub memories: Arc<MemoryStore>,
    /// Upstream generative-language client for the enhancement proxy.
    pub gemini: GeminiClient,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire up the context from a finished config: load (or seed) the memory
    /// box and build the upstream client.
    pub async fn init(config: BoxConfig) -> anyhow::Result<Arc<Self>> {
        let memories = Arc::new(MemoryStore::load(&config.data_dir).await?);
        let gemini = GeminiClient::new(
            config.gemini_api_url.clone(),
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
            std::time::Duration::from_secs(config.gemini_timeout_secs),
        )?;

        Ok(Arc::new(Self {
            config: Arc::new(config),
            memories,
            gemini,
            started_at: std::time::Instant::now(),
        }))
    }
}
