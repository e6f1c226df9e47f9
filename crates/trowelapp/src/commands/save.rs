//! The save flow, create and edit alike. Ordering is the load-bearing part:
//! staged media commit to the blob store as ONE batch BEFORE the record is
//! written. A crash between the two steps leaves an orphaned-but-harmless
//! blob; the reverse order could leave a record referencing blobs that were
//! never durable, which is the failure mode this design exists to rule out.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::{Result, TrowelError};
use crate::location::LocationProvider;
use crate::model::{datetime_text_now, new_find_id, Find, FindInput, MediaRef};
use crate::session::{ComposingSession, SessionMode};
use crate::store::{BlobStore, RecordStore};
use crate::user::User;

enum Target {
    Create { id: String },
    Replace { current: Find },
}

pub fn run<R: RecordStore, B: BlobStore>(
    records: &mut R,
    blobs: &mut B,
    mut session: ComposingSession,
    input: FindInput,
    user: &User,
    location: &dyn LocationProvider,
) -> Result<Find> {
    // Conflicts resolve against the record store BEFORE anything durable
    // happens, so a rejected save leaves both stores untouched.
    let target = match session.mode() {
        SessionMode::New { candidate_id } => {
            let id = match candidate_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => {
                    if records.get(id)?.is_some() {
                        return Err(TrowelError::DuplicateId(id.to_string()));
                    }
                    id.to_string()
                }
                _ => new_find_id(),
            };
            Target::Create { id }
        }
        SessionMode::Edit { original } => {
            // Re-read: the target may have been deleted since the session
            // opened, and an edit must never resurrect it.
            let Some(current) = records.get(&original.id)? else {
                return Err(TrowelError::FindNotFound(original.id.clone()));
            };
            Target::Replace { current }
        }
    };

    // Pending media commit as ONE batch. A failed batch aborts the save
    // with no record written and no partial batch visible.
    let pending: Vec<_> = session
        .staged()
        .iter()
        .filter(|m| !m.stored)
        .cloned()
        .collect();
    if !pending.is_empty() {
        blobs.put(&pending)?;
        debug!(count = pending.len(), "committed media batch");
    }
    session.mark_committed();

    let media: Vec<MediaRef> = session.staged().iter().map(|m| m.to_ref()).collect();

    let find = match target {
        Target::Create { id } => {
            let find = Find {
                id,
                site: user.site.clone(),
                plot: input.plot,
                layer: input.layer,
                description: input.description,
                location: location.current_location(),
                datetime_text: datetime_text_now(),
                created_at: Utc::now(),
                created_by: user.email.clone(),
                updated_at: None,
                media,
            };
            records.add(&find)?;
            find
        }
        Target::Replace { current } => {
            let find = Find {
                id: current.id,
                site: current.site,
                plot: input.plot,
                layer: input.layer,
                description: input.description,
                // Captured once at creation, never re-entered on edit.
                location: current.location,
                datetime_text: current.datetime_text,
                created_at: current.created_at,
                created_by: current.created_by,
                updated_at: Some(Utc::now()),
                media,
            };
            records.update(&find)?;

            // Cascade deletes for media detached during the session, only
            // after the record write stuck. Best-effort per item.
            for id in session.removed_ids() {
                if let Err(err) = blobs.delete(id) {
                    warn!(media_id = %id, error = %err, "could not delete detached media blob");
                }
            }
            find
        }
    };

    // `session` drops here, releasing any remaining staged payloads.
    Ok(find)
}
