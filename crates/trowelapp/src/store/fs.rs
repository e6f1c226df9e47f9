//! Filesystem stores.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data>/
//! ├── finds.json          # the whole record collection, one JSON array
//! ├── user.json           # current user (see crate::user)
//! ├── sites.json          # site registry overrides (see crate::sites)
//! └── media/
//!     ├── media.json      # id -> {kind, mime, name} index
//!     └── media-{id}.bin  # one payload file per blob
//! ```
//!
//! Every JSON write goes through tmp-file + rename so a crash mid-write
//! leaves the previous value intact. Blob entries become visible only through
//! `media.json`, so a batch that dies before the index rename leaves no
//! readable entry; stray payload files are removed best-effort.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{BlobEntry, BlobStore, RecordStore};
use crate::error::{Result, TrowelError};
use crate::media::{MediaKind, StagedMedia};
use crate::model::Find;

const FINDS_FILE: &str = "finds.json";
const MEDIA_INDEX_FILE: &str = "media.json";

/// Atomic JSON-value write shared by both stores.
fn write_atomic(dir: &Path, file_name: &str, contents: &[u8]) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(TrowelError::Io)?;
    }
    let tmp = dir.join(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));
    fs::write(&tmp, contents).map_err(TrowelError::Io)?;
    fs::rename(&tmp, dir.join(file_name)).map_err(TrowelError::Io)?;
    Ok(())
}

pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn finds_path(&self) -> PathBuf {
        self.root.join(FINDS_FILE)
    }

    /// Tolerant read: a missing or corrupt file is an empty collection, not
    /// a fatal error. The next successful write repairs it.
    fn read_all(&self) -> Vec<Find> {
        let path = self.finds_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(finds) => finds,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "unreadable finds.json, treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&self, finds: &[Find]) -> Result<()> {
        let contents = serde_json::to_vec_pretty(finds).map_err(TrowelError::Serialization)?;
        write_atomic(&self.root, FINDS_FILE, &contents)
    }
}

impl RecordStore for FsRecordStore {
    fn list(&self) -> Result<Vec<Find>> {
        Ok(self.read_all())
    }

    fn get(&self, id: &str) -> Result<Option<Find>> {
        Ok(self.read_all().into_iter().find(|f| f.id == id))
    }

    fn add(&mut self, find: &Find) -> Result<()> {
        let mut finds = self.read_all();
        finds.insert(0, find.clone());
        self.write_all(&finds)
    }

    fn update(&mut self, find: &Find) -> Result<()> {
        let mut finds = self.read_all();
        let Some(slot) = finds.iter_mut().find(|f| f.id == find.id) else {
            return Err(TrowelError::FindNotFound(find.id.clone()));
        };
        *slot = find.clone();
        self.write_all(&finds)
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        let mut finds = self.read_all();
        let before = finds.len();
        finds.retain(|f| f.id != id);
        if finds.len() == before {
            return Ok(false);
        }
        self.write_all(&finds)?;
        Ok(true)
    }
}

/// Index entry for one blob; the payload lives next to it in its own file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlobMeta {
    kind: MediaKind,
    mime: String,
    name: String,
}

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(MEDIA_INDEX_FILE)
    }

    fn payload_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("media-{}.bin", id))
    }

    fn read_index(&self) -> HashMap<String, BlobMeta> {
        let raw = match fs::read_to_string(self.index_path()) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    fn write_index(&self, index: &HashMap<String, BlobMeta>) -> Result<()> {
        let contents = serde_json::to_vec_pretty(index).map_err(TrowelError::Serialization)?;
        write_atomic(&self.root, MEDIA_INDEX_FILE, &contents)
    }
}

impl BlobStore for FsBlobStore {
    fn put(&mut self, items: &[StagedMedia]) -> Result<()> {
        for item in items {
            if item.payload.is_none() {
                return Err(TrowelError::Store(format!(
                    "Media item {} has no payload to commit",
                    item.id
                )));
            }
        }

        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(TrowelError::Io)?;
        }

        let mut index = self.read_index();
        let mut placed: Vec<PathBuf> = Vec::new();

        let rollback = |placed: &[PathBuf]| {
            for path in placed {
                if let Err(err) = fs::remove_file(path) {
                    warn!(path = %path.display(), error = %err, "could not roll back blob payload");
                }
            }
        };

        for item in items {
            let payload = item.payload.as_deref().unwrap_or_default();
            let target = self.payload_path(&item.id);
            let tmp = self.root.join(format!(".media-{}.tmp", Uuid::new_v4()));

            let written = fs::write(&tmp, payload).and_then(|_| fs::rename(&tmp, &target));
            if let Err(err) = written {
                let _ = fs::remove_file(&tmp);
                rollback(&placed);
                return Err(TrowelError::Io(err));
            }

            placed.push(target);
            index.insert(
                item.id.clone(),
                BlobMeta {
                    kind: item.kind,
                    mime: item.mime.clone(),
                    name: item.name.clone(),
                },
            );
        }

        // The index rename is the commit point for the whole batch.
        if let Err(err) = self.write_index(&index) {
            rollback(&placed);
            return Err(err);
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<BlobEntry>> {
        let index = self.read_index();
        let Some(meta) = index.get(id) else {
            return Ok(None);
        };
        // An indexed entry whose payload file vanished degrades to absent.
        let bytes = match fs::read(self.payload_path(id)) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(TrowelError::Io(err)),
        };
        Ok(Some(BlobEntry {
            id: id.to_string(),
            kind: meta.kind,
            mime: meta.mime.clone(),
            name: meta.name.clone(),
            bytes,
        }))
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let mut index = self.read_index();
        if index.remove(id).is_some() {
            self.write_index(&index)?;
        }
        match fs::remove_file(self.payload_path(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TrowelError::Io(err)),
        }
    }
}
