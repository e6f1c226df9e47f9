//! # Domain Model: Find Records
//!
//! A [`Find`] is one documented discovery event tied to a site/plot/layer.
//! The record itself is small structured metadata; attached photos and video
//! live in the blob store and are referenced here only through [`MediaRef`]
//! entries (`{id, kind, mime, name}`). Keeping payloads out of the record
//! collection is what lets the whole collection be serialized as one JSON
//! value without blowing past storage quotas.
//!
//! ## Field lifecycle
//!
//! Set once at creation and never overwritten by an edit:
//! - `id`, `site`, `created_at`, `created_by`
//! - `location` — the GPS string captured when the find was recorded
//! - `datetime_text` — the wall-clock snapshot shown to the surveyor
//!
//! Overwritten on every edit: `plot`, `layer`, `description`, `media`.
//! `updated_at` stays `None` until the first edit.
//!
//! ## Id format
//!
//! Generated ids look like `FIND-1722945600000-A3F09B`: a millisecond
//! timestamp plus six random hex digits. A user may also supply their own id
//! at creation (field teams often pre-print QR labels); uniqueness is then
//! checked against the record store before the save commits.
//!
//! A media ref whose blob has gone missing is NOT an error anywhere in this
//! crate: readers degrade to "preview unavailable" and the record stays
//! fully usable.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TrowelError};
use crate::media::MediaKind;

/// Lightweight pointer to a blob-store entry, stored inside a find record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
    pub kind: MediaKind,
    pub mime: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Find {
    pub id: String,
    pub site: String,
    pub plot: String,
    pub layer: String,
    pub description: String,
    pub location: String,
    pub datetime_text: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    // Absent on records that have never been edited, and in data written
    // before these fields existed.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media: Vec<MediaRef>,
}

/// The user-editable fields of a find, validated once at construction.
#[derive(Debug, Clone)]
pub struct FindInput {
    pub plot: String,
    pub layer: String,
    pub description: String,
}

impl FindInput {
    pub fn new(plot: String, layer: String, description: String) -> Result<Self> {
        let input = Self {
            plot: plot.trim().to_string(),
            layer: layer.trim().to_string(),
            description: description.trim().to_string(),
        };
        if input.plot.is_empty() {
            return Err(TrowelError::Validation("Plot is required".to_string()));
        }
        if input.layer.is_empty() {
            return Err(TrowelError::Validation("Layer is required".to_string()));
        }
        if input.description.is_empty() {
            return Err(TrowelError::Validation(
                "Description is required".to_string(),
            ));
        }
        Ok(input)
    }
}

/// Generate a fresh find id: `FIND-<millis>-<6 uppercase hex>`.
pub fn new_find_id() -> String {
    format!(
        "FIND-{}-{}",
        Utc::now().timestamp_millis(),
        hex_suffix(6).to_uppercase()
    )
}

/// Wall-clock snapshot recorded alongside a new find, in the local timezone.
pub fn datetime_text_now() -> String {
    Local::now().format("%d/%m/%Y %H:%M:%S").to_string()
}

pub(crate) fn hex_suffix(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_string()
}
