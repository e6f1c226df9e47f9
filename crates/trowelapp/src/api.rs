//! # API Facade
//!
//! The single entry point for all find operations, regardless of the UI in
//! front of it. The facade dispatches to the command modules and returns
//! structured types; it holds no business logic of its own and does no I/O
//! formatting.
//!
//! `FindsApi<R, B>` is generic over both store traits:
//! - production: `FindsApi<FsRecordStore, FsBlobStore>`
//! - testing: `FindsApi<MemRecordStore, MemBlobStore>`
//!
//! which keeps every flow testable without touching the filesystem.
//!
//! The facade owns the current [`User`] for the duration of a run; login and
//! logout are the [`crate::user::UserStore`]'s concern, resolved by the
//! caller before constructing the facade.

use std::path::{Path, PathBuf};

use crate::commands;
use crate::commands::delete::DeleteOutcome;
use crate::commands::export::ExportSummary;
use crate::commands::get::FindView;
use crate::commands::import::ImportSummary;
use crate::error::{Result, TrowelError};
use crate::location::LocationProvider;
use crate::model::{Find, FindInput};
use crate::session::ComposingSession;
use crate::store::{BlobStore, RecordStore};
use crate::user::User;

pub struct FindsApi<R: RecordStore, B: BlobStore> {
    records: R,
    blobs: B,
    user: User,
}

impl<R: RecordStore, B: BlobStore> FindsApi<R, B> {
    pub fn new(records: R, blobs: B, user: User) -> Self {
        Self {
            records,
            blobs,
            user,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn list_finds(&self) -> Result<Vec<Find>> {
        commands::list::run(&self.records)
    }

    pub fn get_find(&self, id: &str) -> Result<Option<FindView>> {
        commands::get::run(&self.records, &self.blobs, id)
    }

    /// Start composing a new find, optionally under a user-supplied id.
    pub fn open_new(&self, candidate_id: Option<String>) -> ComposingSession {
        ComposingSession::new_find(candidate_id)
    }

    /// Start editing an existing find, media rehydrated for display.
    pub fn open_edit(&self, id: &str) -> Result<ComposingSession> {
        let Some(find) = self.records.get(id)? else {
            return Err(TrowelError::FindNotFound(id.to_string()));
        };
        Ok(ComposingSession::edit_find(find, &self.blobs))
    }

    /// Commit a composing session. See [`commands::save`] for the ordering
    /// guarantees; the session is consumed either way.
    pub fn save_find(
        &mut self,
        session: ComposingSession,
        input: FindInput,
        location: &dyn LocationProvider,
    ) -> Result<Find> {
        commands::save::run(
            &mut self.records,
            &mut self.blobs,
            session,
            input,
            &self.user,
            location,
        )
    }

    pub fn delete_find(&mut self, id: &str) -> Result<DeleteOutcome> {
        commands::delete::run(&mut self.records, &mut self.blobs, id)
    }

    pub fn export(&self, output: Option<PathBuf>) -> Result<ExportSummary> {
        commands::export::run(&self.records, &self.blobs, output)
    }

    pub fn import(&mut self, path: &Path) -> Result<ImportSummary> {
        commands::import::run(&mut self.records, &mut self.blobs, path)
    }
}
