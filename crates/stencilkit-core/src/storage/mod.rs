//! Named diagram snapshots.
//!
//! A store maps keys to [`DiagramState`] values serialized as JSON. Both
//! backends hold the JSON text, so a snapshot that survives the memory store
//! survives a file.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::state::DiagramState;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No diagram stored under {0:?}")]
    NotFound(String),
    #[error("Invalid diagram key {0:?}")]
    InvalidKey(String),
    #[error("Malformed diagram: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A keyed store of diagram snapshots.
pub trait Storage {
    fn save(&self, key: &str, diagram: &DiagramState) -> StorageResult<()>;

    fn load(&self, key: &str) -> StorageResult<DiagramState>;

    /// Returns whether anything was removed.
    fn delete(&self, key: &str) -> StorageResult<bool>;

    /// Stored keys, sorted.
    fn keys(&self) -> StorageResult<Vec<String>>;

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.keys()?.iter().any(|k| k == key))
    }
}

/// Keys are non-empty and free of control characters.
pub(crate) fn check_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() || key.chars().any(char::is_control) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
