//! # Storage Layer
//!
//! Two independent stores, two traits:
//!
//! - [`RecordStore`] — the find-record collection. Small structured metadata,
//!   persisted as ONE JSON value with whole-collection read-modify-write
//!   semantics. Simple, and it means two concurrent writers race with
//!   last-writer-wins; the single-surveyor usage model accepts that.
//! - [`BlobStore`] — keyed binary storage for photo/video payloads. Large
//!   entries, written one file per blob, with a batch `put` that is all or
//!   nothing.
//!
//! The split is deliberate: mixing multi-megabyte payloads into the record
//! collection would force binary-to-text encoding and exhaust the structured
//! store's quota. The blob store keeps no back-references: a blob is owned by
//! whichever find(s) reference its id, and deletion is always driven by the
//! lifecycle layer, never inferred here.
//!
//! Consistency contract between the two:
//! - a find's `media` refs SHOULD all resolve in the blob store, but a miss
//!   is a degraded read (no preview), never an error;
//! - orphaned blobs (entry with no referencing find) are harmless and bounded,
//!   left to die quietly.
//!
//! ## Implementations
//!
//! - [`fs`]: production stores under the data directory (`finds.json`,
//!   `media/`), with atomic tmp-file + rename writes.
//! - [`memory`]: in-memory stores for testing logic without filesystem I/O,
//!   including write-error simulation.

use crate::error::Result;
use crate::media::{MediaKind, StagedMedia};
use crate::model::Find;

pub mod fs;
pub mod memory;

/// A durable blob-store entry: the media reference fields plus the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub id: String,
    pub kind: MediaKind,
    pub mime: String,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Durable CRUD for find records, newest-first iteration order.
pub trait RecordStore {
    /// Full ordered sequence, most recently added first. Absent or corrupt
    /// storage yields an empty list, never an error.
    fn list(&self) -> Result<Vec<Find>>;

    /// Linear scan by id; field surveys stay in the hundreds of records.
    fn get(&self, id: &str) -> Result<Option<Find>>;

    /// Insert at the front. A rejected write (quota, IO) surfaces as an
    /// error to the caller, never a silent no-op.
    fn add(&mut self, find: &Find) -> Result<()>;

    /// Replace the record with matching id in place, preserving its position.
    /// NOT an upsert: an unknown id is `FindNotFound`.
    fn update(&mut self, find: &Find) -> Result<()>;

    /// Remove by id. Returns whether a record was actually removed; deleting
    /// an unknown id is an idempotent `Ok(false)`.
    fn delete(&mut self, id: &str) -> Result<bool>;
}

/// Durable keyed storage for binary media payloads.
pub trait BlobStore {
    /// Write a batch of staged items, each carrying a payload, as a single
    /// all-or-nothing commit: a failed batch leaves no readable entry.
    /// Items without a payload reject the whole batch.
    fn put(&mut self, items: &[StagedMedia]) -> Result<()>;

    /// Fetch an entry. A missing id is `Ok(None)`, never an error.
    fn get(&self, id: &str) -> Result<Option<BlobEntry>>;

    /// Remove an entry if present; idempotent.
    fn delete(&mut self, id: &str) -> Result<()>;
}
