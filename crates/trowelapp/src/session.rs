//! # Composing Session
//!
//! One create-or-edit session over a single find. The session is an explicit
//! value owned by the caller; there is no ambient "currently staged media"
//! state anywhere in the crate. It owns every staged payload, so dropping the
//! session (save or abandon alike) frees the buffers.
//!
//! State machine: `idle → composing → (saving) → idle`. A session starts when
//! the UI opens "new find" or "edit find" and ends when
//! [`crate::commands::save::run`] consumes it or it is dropped.

use tracing::warn;

use crate::error::Result;
use crate::media::{stage_files, PickedFile, StagedMedia};
use crate::model::Find;
use crate::store::BlobStore;

#[derive(Debug)]
pub enum SessionMode {
    /// Composing a brand-new find, optionally under a user-supplied id
    /// (pre-printed labels); the id is collision-checked at save time.
    New { candidate_id: Option<String> },
    /// Editing an existing record. `original` is the snapshot loaded when the
    /// session opened; immutable fields are carried from the store at save.
    Edit { original: Find },
}

#[derive(Debug)]
pub struct ComposingSession {
    mode: SessionMode,
    staged: Vec<StagedMedia>,
    /// Durable media ids detached during this session; their blobs are
    /// deleted only after the record write succeeds.
    removed: Vec<String>,
}

impl ComposingSession {
    pub fn new_find(candidate_id: Option<String>) -> Self {
        Self {
            mode: SessionMode::New { candidate_id },
            staged: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Open an edit session, rehydrating each media ref from the blob store
    /// for display. A missing blob is tolerated: the item stays listed with
    /// no payload, and the record remains fully editable.
    pub fn edit_find<B: BlobStore>(original: Find, blobs: &B) -> Self {
        let staged = original
            .media
            .iter()
            .map(|reference| {
                let payload = match blobs.get(&reference.id) {
                    Ok(Some(entry)) => Some(entry.bytes),
                    Ok(None) => None,
                    Err(err) => {
                        warn!(media_id = %reference.id, error = %err, "could not rehydrate media");
                        None
                    }
                };
                StagedMedia {
                    id: reference.id.clone(),
                    kind: reference.kind,
                    mime: reference.mime.clone(),
                    name: reference.name.clone(),
                    payload,
                    stored: true,
                }
            })
            .collect();

        Self {
            mode: SessionMode::Edit { original },
            staged,
            removed: Vec::new(),
        }
    }

    /// Stage picked files and append them, preserving pick order. Staging
    /// rules (type filter, 15 MiB cap) are in [`crate::media`].
    pub fn attach(&mut self, files: Vec<PickedFile>) -> Result<usize> {
        let items = stage_files(files)?;
        let added = items.len();
        self.staged.extend(items);
        Ok(added)
    }

    /// Drop a staged item. If it was already durable, its id is remembered so
    /// the save flow can cascade a blob delete. Unknown ids are a no-op.
    pub fn detach(&mut self, media_id: &str) -> bool {
        let Some(pos) = self.staged.iter().position(|m| m.id == media_id) else {
            return false;
        };
        let item = self.staged.remove(pos);
        if item.stored {
            self.removed.push(item.id);
        }
        true
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn staged(&self) -> &[StagedMedia] {
        &self.staged
    }

    pub fn removed_ids(&self) -> &[String] {
        &self.removed
    }

    /// Mark every pending item durable and release its payload. Called by the
    /// save flow right after the blob batch commits.
    pub(crate) fn mark_committed(&mut self) {
        for item in &mut self.staged {
            item.stored = true;
            item.payload = None;
        }
    }
}
