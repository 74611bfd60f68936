// memory/mod.rs — Memory domain model.
//
// A Memory is one keepsake in the box: a letter (inline text) or a photo /
// video (a URL, typically a data URL from an upload). Records are immutable
// after creation; the only lifecycle transitions are create and delete.

pub mod store;

pub use store::MemoryStore;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ─── Types ────────────────────────────────────────────────────────────────────

/// What kind of keepsake a `Memory` holds. Fixed at creation; decides whether
/// the record carries `content` (letter) or `url` (photo/video).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Letter,
    Photo,
    Video,
}

/// One entry in the memory box.
///
/// Exactly one of `content` / `url` is populated, determined by `kind`
/// (enforced by [`Memory::create`]). The wire field name for `kind` is
/// `type`, matching the persisted blob format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub title: String,
    /// Letter body. Present iff `kind == Letter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Media reference (data URL or plain URL). Present iff `kind` is photo/video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Creation time, unix milliseconds. Display ordering only — the
    /// collection itself preserves insertion order (newest first).
    pub timestamp: i64,
    pub author: String,
}

/// Caller-supplied fields for a new memory. `id` and `timestamp` are assigned
/// by [`Memory::create`]; `author` defaults to `"Us"`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMemory {
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidMemory {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("a letter needs text content")]
    MissingContent,
    #[error("a {0} needs an uploaded file or URL")]
    MissingUrl(&'static str),
    #[error("a letter cannot carry a media URL")]
    UrlOnLetter,
    #[error("a photo or video cannot carry letter content")]
    ContentOnMedia,
}

// ─── Construction ─────────────────────────────────────────────────────────────

impl Memory {
    /// Build a validated record from user input, assigning id and timestamp.
    pub fn create(new: NewMemory) -> Result<Self, InvalidMemory> {
        if new.title.trim().is_empty() {
            return Err(InvalidMemory::EmptyTitle);
        }

        let (content, url) = match new.kind {
            MemoryKind::Letter => {
                if new.url.as_deref().is_some_and(|u| !u.is_empty()) {
                    return Err(InvalidMemory::UrlOnLetter);
                }
                match new.content.filter(|c| !c.trim().is_empty()) {
                    Some(c) => (Some(c), None),
                    None => return Err(InvalidMemory::MissingContent),
                }
            }
            MemoryKind::Photo | MemoryKind::Video => {
                if new.content.as_deref().is_some_and(|c| !c.is_empty()) {
                    return Err(InvalidMemory::ContentOnMedia);
                }
                let label = if new.kind == MemoryKind::Photo {
                    "photo"
                } else {
                    "video"
                };
                match new.url.filter(|u| !u.is_empty()) {
                    Some(u) => (None, Some(u)),
                    None => return Err(InvalidMemory::MissingUrl(label)),
                }
            }
        };

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            title: new.title,
            content,
            url,
            timestamp: Utc::now().timestamp_millis(),
            author: new.author.unwrap_or_else(|| "Us".to_string()),
        })
    }
}

// ─── Seed data ────────────────────────────────────────────────────────────────

/// The two example records a fresh (or unrecoverable) box starts with.
pub fn seed_memories() -> Vec<Memory> {
    let now = Utc::now().timestamp_millis();
    vec![
        Memory {
            id: "1".to_string(),
            kind: MemoryKind::Letter,
            title: "Our First Meeting".to_string(),
            content: Some(
                "I still remember the way the light hit your hair that afternoon. \
                 It felt like time stood still, and in that moment, I knew everything \
                 was about to change..."
                    .to_string(),
            ),
            url: None,
            timestamp: now - 10_000_000,
            author: "Alex".to_string(),
        },
        Memory {
            id: "2".to_string(),
            kind: MemoryKind::Photo,
            title: "That Rainy Day".to_string(),
            content: None,
            url: Some("https://picsum.photos/800/600?random=1".to_string()),
            timestamp: now - 20_000_000,
            author: "Jordan".to_string(),
        },
    ]
}
