use super::{Storage, StorageError, StorageResult, check_key};
use crate::state::DiagramState;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Keeps snapshots as JSON text in a map. Useful for tests and as a
/// clipboard-style scratch store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> StorageResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.documents.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, diagram: &DiagramState) -> StorageResult<()> {
        check_key(key)?;
        let json = diagram.to_json()?;
        debug!("Keeping diagram {:?} in memory ({} stencils)", key, diagram.stencils.len());
        self.documents()?.insert(key.to_string(), json);
        Ok(())
    }

    fn load(&self, key: &str) -> StorageResult<DiagramState> {
        let documents = self.documents()?;
        let json = documents.get(key).ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(DiagramState::from_json(json)?)
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        Ok(self.documents()?.remove(key).is_some())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.documents()?.keys().cloned().collect())
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.documents()?.contains_key(key))
    }
}
