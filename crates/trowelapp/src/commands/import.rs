//! Survey bundle import, the counterpart to [`super::export`]. Finds whose id
//! already exists locally are skipped untouched; the rest are merged oldest
//! first so the store stays newest-first, each with its blob payloads
//! committed before the record lands.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::warn;

use super::export::{ARCHIVE_FINDS, ARCHIVE_MEDIA_DIR};
use crate::error::{Result, TrowelError};
use crate::media::StagedMedia;
use crate::model::Find;
use crate::store::{BlobStore, RecordStore};

#[derive(Debug, Default)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
    pub blobs: usize,
}

pub fn run<R: RecordStore, B: BlobStore>(
    records: &mut R,
    blobs: &mut B,
    path: &Path,
) -> Result<ImportSummary> {
    let file = File::open(path).map_err(TrowelError::Io)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut finds: Option<Vec<Find>> = None;
    let mut payloads: HashMap<String, Vec<u8>> = HashMap::new();

    for entry in archive.entries().map_err(TrowelError::Io)? {
        let mut entry = entry.map_err(TrowelError::Io)?;
        let name = entry
            .path()
            .map_err(TrowelError::Io)?
            .to_string_lossy()
            .into_owned();

        if name == ARCHIVE_FINDS {
            let mut raw = Vec::new();
            entry.read_to_end(&mut raw).map_err(TrowelError::Io)?;
            finds = Some(serde_json::from_slice(&raw).map_err(TrowelError::Serialization)?);
        } else if let Some(rest) = name.strip_prefix(ARCHIVE_MEDIA_DIR) {
            let Some(id) = rest.strip_suffix(".bin") else {
                continue;
            };
            let mut raw = Vec::new();
            entry.read_to_end(&mut raw).map_err(TrowelError::Io)?;
            payloads.insert(id.to_string(), raw);
        }
    }

    let Some(finds) = finds else {
        return Err(TrowelError::Store(format!(
            "Not a trowel bundle: {} has no {}",
            path.display(),
            ARCHIVE_FINDS
        )));
    };

    let mut summary = ImportSummary::default();

    // The bundle is newest-first like the store; re-add oldest first so the
    // merged collection keeps that order.
    for find in finds.into_iter().rev() {
        if records.get(&find.id)?.is_some() {
            summary.skipped += 1;
            continue;
        }

        let mut batch = Vec::new();
        for reference in &find.media {
            if blobs.get(&reference.id)?.is_some() {
                continue;
            }
            let Some(bytes) = payloads.get(&reference.id) else {
                warn!(media_id = %reference.id, "bundle carries no payload for ref, importing dangling");
                continue;
            };
            batch.push(StagedMedia {
                id: reference.id.clone(),
                kind: reference.kind,
                mime: reference.mime.clone(),
                name: reference.name.clone(),
                payload: Some(bytes.clone()),
                stored: false,
            });
        }

        // Same ordering as a save: media first, then the record.
        if !batch.is_empty() {
            blobs.put(&batch)?;
            summary.blobs += batch.len();
        }
        records.add(&find)?;
        summary.added += 1;
    }

    Ok(summary)
}
