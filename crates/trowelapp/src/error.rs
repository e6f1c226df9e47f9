use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrowelError {
    #[error("Find not found: {0}")]
    FindNotFound(String),

    #[error("A find with id '{0}' already exists")]
    DuplicateId(String),

    #[error("{0}")]
    Validation(String),

    #[error("Media file too large: {name} ({size} bytes)")]
    MediaTooLarge { name: String, size: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, TrowelError>;
