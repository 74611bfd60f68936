// memory/store.rs — JSON-file-backed memory collection.
//
// The whole collection persists as one JSON array at {data_dir}/memories.json,
// mirroring the single-blob model the box has always used. Reads are served
// from memory; every mutation rewrites the blob under the write lock so the
// file always holds a consistent snapshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{seed_memories, Memory};

const BLOB_FILE: &str = "memories.json";

pub struct MemoryStore {
    path: PathBuf,
    memories: RwLock<Vec<Memory>>,
}

impl MemoryStore {
    /// Load the collection from `{data_dir}/memories.json`.
    ///
    /// A missing file seeds the box with the built-in example records and
    /// persists them. A file that fails to parse is logged and replaced with
    /// the seed data — a corrupt blob is never fatal.
    pub async fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(BLOB_FILE);

        let memories = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<Vec<Memory>>(&raw) {
                Ok(list) => {
                    info!(count = list.len(), path = %path.display(), "memory box loaded");
                    list
                }
                Err(e) => {
                    warn!(path = %path.display(), err = %e, "memories.json is corrupt — reseeding");
                    seed_memories()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no memory box yet — seeding example records");
                seed_memories()
            }
            Err(e) => {
                return Err(e).context(format!("reading {}", path.display()));
            }
        };

        let store = Self {
            path,
            memories: RwLock::new(memories),
        };

        // Persist immediately so seeds (or the reseeded blob) survive a restart.
        let guard = store.memories.read().await;
        store.persist(&guard).await?;
        drop(guard);

        Ok(store)
    }

    /// Snapshot of the collection in stored order (newest first).
    pub async fn list(&self) -> Vec<Memory> {
        self.memories.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Memory> {
        self.memories.read().await.iter().find(|m| m.id == id).cloned()
    }

    /// Prepend a new record (newest first) and rewrite the blob.
    pub async fn add(&self, memory: Memory) -> Result<()> {
        let mut guard = self.memories.write().await;
        guard.insert(0, memory);
        self.persist(&guard).await
    }

    /// Remove a record by id. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let mut guard = self.memories.write().await;
        let before = guard.len();
        guard.retain(|m| m.id != id);
        if guard.len() == before {
            return Ok(false);
        }
        self.persist(&guard).await?;
        Ok(true)
    }

    pub async fn count(&self) -> usize {
        self.memories.read().await.len()
    }

    /// Write the snapshot to a sibling file, then rename it over the target.
    /// An interrupted write can only ever leave a stale `.tmp` behind — the
    /// blob itself is always a complete snapshot.
    async fn persist(&self, memories: &[Memory]) -> Result<()> {
        let blob = serde_json::to_string_pretty(memories)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob)
            .await
            .context(format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .context(format!("replacing {}", self.path.display()))
    }
}
