//! Geolocation collaborator. The core never talks to GPS hardware; it asks a
//! [`LocationProvider`] for one `"lat,lon"` string at find-creation time and
//! records whatever comes back, including the unavailable marker. Edits never
//! consult it again; `location` is immutable after creation.

use crate::sites;

/// Locale marker recorded when no position could be resolved.
pub const LOCATION_UNAVAILABLE: &str = "מיקום לא זמין";

pub trait LocationProvider {
    fn current_location(&self) -> String;
}

/// A caller-supplied coordinate string (e.g. a CLI `--location` flag).
pub struct FixedLocation(pub String);

impl LocationProvider for FixedLocation {
    fn current_location(&self) -> String {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            LOCATION_UNAVAILABLE.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Falls back to the registered coordinates of the surveyor's site.
pub struct SiteLocation {
    pub site: String,
    pub data_dir: std::path::PathBuf,
}

impl LocationProvider for SiteLocation {
    fn current_location(&self) -> String {
        sites::location_of(&self.data_dir, &self.site)
            .filter(|loc| !loc.trim().is_empty())
            .unwrap_or_else(|| LOCATION_UNAVAILABLE.to_string())
    }
}

/// No position source at all.
pub struct UnavailableLocation;

impl LocationProvider for UnavailableLocation {
    fn current_location(&self) -> String {
        LOCATION_UNAVAILABLE.to_string()
    }
}
