//! Data-directory resolution. `TROWEL_DATA_DIR` wins (tests, scripting);
//! otherwise the OS-appropriate data dir via the `directories` crate.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::{Result, TrowelError};

pub const DATA_DIR_ENV: &str = "TROWEL_DATA_DIR";

pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let dirs = ProjectDirs::from("", "", "trowel")
        .ok_or_else(|| TrowelError::Store("Could not resolve a data directory".to_string()))?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Where the blob store lives, relative to the data dir.
pub fn media_dir(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join("media")
}
