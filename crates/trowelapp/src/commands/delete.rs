use tracing::warn;

use crate::error::{Result, TrowelError};
use crate::model::Find;
use crate::store::{BlobStore, RecordStore};

#[derive(Debug)]
pub struct DeleteOutcome {
    pub removed: Find,
    /// Media ids whose blob cleanup failed; bounded orphans, not an error.
    pub failed_blob_ids: Vec<String>,
}

/// Delete a find and cascade its media: every referenced blob is removed
/// best-effort (per-item failures logged and collected, never aborting),
/// then the record itself. Only a failing record delete is an error.
pub fn run<R: RecordStore, B: BlobStore>(
    records: &mut R,
    blobs: &mut B,
    id: &str,
) -> Result<DeleteOutcome> {
    let Some(find) = records.get(id)? else {
        return Err(TrowelError::FindNotFound(id.to_string()));
    };

    let mut failed_blob_ids = Vec::new();
    for reference in &find.media {
        if let Err(err) = blobs.delete(&reference.id) {
            warn!(media_id = %reference.id, error = %err, "could not delete media blob");
            failed_blob_ids.push(reference.id.clone());
        }
    }

    if !records.delete(id)? {
        return Err(TrowelError::FindNotFound(id.to_string()));
    }

    Ok(DeleteOutcome {
        removed: find,
        failed_blob_ids,
    })
}
