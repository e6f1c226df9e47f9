//! # Media Staging
//!
//! Converts user-picked files into [`StagedMedia`] items ready for display or
//! for a blob-store commit. Staging is a pure in-memory transformation: no
//! durable writes happen here, and the staged item owns its payload until the
//! save flow commits it (or the session is dropped).
//!
//! Rules, in order, per file:
//! 1. Files whose declared content type is neither `image/*` nor `video/*`
//!    are skipped silently.
//! 2. Any single media file over [`MAX_MEDIA_BYTES`] fails the WHOLE batch:
//!    a hard cap, not a warning, to bound memory on field devices.
//! 3. Each accepted file gets a fresh media id and a kind derived from its
//!    content type; input order is preserved.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrowelError};
use crate::model::{hex_suffix, MediaRef};

/// Hard cap on a single media file: 15 MiB.
pub const MAX_MEDIA_BYTES: u64 = 15 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a declared content type. `None` means "not media, skip it".
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("video/") {
            Some(Self::Video)
        } else if content_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }
}

/// A file as handed over by whatever picker the UI uses.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A media item held in memory during a composing session.
///
/// Exactly one of two states:
/// - freshly staged: `stored == false`, `payload` owns the bytes;
/// - already durable: `stored == true`, `payload` optionally rehydrated from
///   the blob store for display (`None` when the blob is missing).
#[derive(Debug, Clone)]
pub struct StagedMedia {
    pub id: String,
    pub kind: MediaKind,
    pub mime: String,
    pub name: String,
    pub payload: Option<Vec<u8>>,
    pub stored: bool,
}

impl StagedMedia {
    pub fn to_ref(&self) -> MediaRef {
        MediaRef {
            id: self.id.clone(),
            kind: self.kind,
            mime: self.mime.clone(),
            name: self.name.clone(),
        }
    }
}

/// Generate a fresh media id: `M-<millis>-<6 lowercase hex>`.
pub fn new_media_id() -> String {
    format!(
        "M-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        hex_suffix(6)
    )
}

/// Stage a batch of picked files. See the module docs for the rules.
pub fn stage_files(files: Vec<PickedFile>) -> Result<Vec<StagedMedia>> {
    let mut items = Vec::new();

    for file in files {
        let Some(kind) = MediaKind::from_content_type(&file.content_type) else {
            continue;
        };

        let size = file.bytes.len() as u64;
        if size > MAX_MEDIA_BYTES {
            return Err(TrowelError::MediaTooLarge {
                name: file.name,
                size,
            });
        }

        items.push(StagedMedia {
            id: new_media_id(),
            kind,
            mime: file.content_type,
            name: file.name,
            payload: Some(file.bytes),
            stored: false,
        });
    }

    Ok(items)
}
