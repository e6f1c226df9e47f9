//! Site registry: the survey sites a user can be assigned to, each with its
//! reference coordinates. Ships with the product's built-in Israeli tells;
//! additions are persisted to `sites.json` in the data directory and merged
//! over the defaults on read.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrowelError};

const SITES_FILE: &str = "sites.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteEntry {
    pub name: String,
    pub location: String,
}

static DEFAULT_SITES: Lazy<Vec<SiteEntry>> = Lazy::new(|| {
    [
        ("תל מגידו", "32.5856,35.1825"),
        ("תל חצור", "33.0178,35.5694"),
        ("מצדה", "31.3156,35.3536"),
        ("קיסריה", "32.5000,34.8928"),
        ("עיר דוד", "31.7767,35.2350"),
        ("תל לכיש", "31.5591,34.8316"),
        ("תל באר שבע", "31.2516,34.7913"),
        ("קומראן", "31.7413,35.4602"),
    ]
    .into_iter()
    .map(|(name, location)| SiteEntry {
        name: name.to_string(),
        location: location.to_string(),
    })
    .collect()
});

fn read_stored(data_dir: &Path) -> Vec<SiteEntry> {
    let raw = match fs::read_to_string(data_dir.join(SITES_FILE)) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

/// All known sites: defaults first, then stored additions.
pub fn all(data_dir: &Path) -> Vec<SiteEntry> {
    let mut sites = DEFAULT_SITES.clone();
    for stored in read_stored(data_dir) {
        if !sites.iter().any(|s| s.name == stored.name) {
            sites.push(stored);
        }
    }
    sites
}

/// Register a new site by name (no coordinates yet). Returns `false` when the
/// name is empty or already known.
pub fn add(data_dir: &Path, name: &str) -> Result<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(false);
    }
    if all(data_dir).iter().any(|s| s.name == name) {
        return Ok(false);
    }

    let mut stored = read_stored(data_dir);
    stored.push(SiteEntry {
        name: name.to_string(),
        location: String::new(),
    });

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(TrowelError::Io)?;
    }
    let contents = serde_json::to_vec_pretty(&stored).map_err(TrowelError::Serialization)?;
    fs::write(data_dir.join(SITES_FILE), contents).map_err(TrowelError::Io)?;
    Ok(true)
}

/// Reference coordinates of a site, if registered with any.
pub fn location_of(data_dir: &Path, name: &str) -> Option<String> {
    all(data_dir)
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_present() {
        let dir = TempDir::new().unwrap();
        let sites = all(dir.path());
        assert!(sites.iter().any(|s| s.name == "תל מגידו"));
        assert_eq!(sites.len(), 8);
    }

    #[test]
    fn test_add_and_merge() {
        let dir = TempDir::new().unwrap();
        assert!(add(dir.path(), "תל דן").unwrap());
        // Duplicate and empty are rejected without error.
        assert!(!add(dir.path(), "תל דן").unwrap());
        assert!(!add(dir.path(), "  ").unwrap());
        assert!(!add(dir.path(), "מצדה").unwrap());

        let sites = all(dir.path());
        assert_eq!(sites.len(), 9);
        assert!(sites.iter().any(|s| s.name == "תל דן" && s.location.is_empty()));
    }

    #[test]
    fn test_location_lookup() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            location_of(dir.path(), "קומראן").as_deref(),
            Some("31.7413,35.4602")
        );
        assert!(location_of(dir.path(), "אתר עלום").is_none());
    }
}
