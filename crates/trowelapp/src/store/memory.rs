//! In-memory stores for testing logic without filesystem I/O.
//!
//! Both stores can simulate a failing durable medium (quota exceeded, dead
//! disk) so command-layer error paths are testable.

use std::collections::HashMap;

use super::{BlobEntry, BlobStore, RecordStore};
use crate::error::{Result, TrowelError};
use crate::media::StagedMedia;
use crate::model::Find;

#[derive(Default)]
pub struct MemRecordStore {
    finds: Vec<Find>,
    simulate_write_error: bool,
}

impl MemRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    fn check_writable(&self) -> Result<()> {
        if self.simulate_write_error {
            return Err(TrowelError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl RecordStore for MemRecordStore {
    fn list(&self) -> Result<Vec<Find>> {
        Ok(self.finds.clone())
    }

    fn get(&self, id: &str) -> Result<Option<Find>> {
        Ok(self.finds.iter().find(|f| f.id == id).cloned())
    }

    fn add(&mut self, find: &Find) -> Result<()> {
        self.check_writable()?;
        self.finds.insert(0, find.clone());
        Ok(())
    }

    fn update(&mut self, find: &Find) -> Result<()> {
        self.check_writable()?;
        let Some(slot) = self.finds.iter_mut().find(|f| f.id == find.id) else {
            return Err(TrowelError::FindNotFound(find.id.clone()));
        };
        *slot = find.clone();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<bool> {
        self.check_writable()?;
        let before = self.finds.len();
        self.finds.retain(|f| f.id != id);
        Ok(self.finds.len() != before)
    }
}

#[derive(Default)]
pub struct MemBlobStore {
    entries: HashMap<String, BlobEntry>,
    simulate_write_error: bool,
}

impl MemBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlobStore for MemBlobStore {
    fn put(&mut self, items: &[StagedMedia]) -> Result<()> {
        if self.simulate_write_error {
            return Err(TrowelError::Store("Simulated write error".to_string()));
        }

        // Validate the whole batch before touching the map, so a bad batch
        // stays invisible like a failed fs transaction.
        let mut staged = Vec::with_capacity(items.len());
        for item in items {
            let Some(payload) = item.payload.clone() else {
                return Err(TrowelError::Store(format!(
                    "Media item {} has no payload to commit",
                    item.id
                )));
            };
            staged.push(BlobEntry {
                id: item.id.clone(),
                kind: item.kind,
                mime: item.mime.clone(),
                name: item.name.clone(),
                bytes: payload,
            });
        }

        for entry in staged {
            self.entries.insert(entry.id.clone(), entry);
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<BlobEntry>> {
        Ok(self.entries.get(id).cloned())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.entries.remove(id);
        Ok(())
    }
}
