//! One JSON file per diagram.

use super::{Storage, StorageError, StorageResult, check_key};
use crate::state::DiagramState;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// Stores each diagram as `<key>.json` in one directory. Characters that are
/// unsafe in file names are replaced with `_`, so distinct keys can collide.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl FileStorage {
    /// Open `root`, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            fs::create_dir_all(&root).map_err(io_error(&root))?;
            info!("Created diagram directory {}", root.display());
        }
        Ok(Self { root })
    }

    /// `<data dir>/stencilkit/diagrams`, falling back to the home directory.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir().or_else(dirs::home_dir).ok_or_else(|| StorageError::Io {
            path: PathBuf::new(),
            source: io::Error::new(io::ErrorKind::NotFound, "no data or home directory"),
        })?;
        Self::new(base.join("stencilkit").join("diagrams"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(stem).with_extension(EXTENSION)
    }
}

impl Storage for FileStorage {
    fn save(&self, key: &str, diagram: &DiagramState) -> StorageResult<()> {
        check_key(key)?;
        let path = self.path_for(key);
        let json = diagram.to_json()?;
        // Write beside the target and rename so a crash never leaves half a file.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(io_error(&staging))?;
        fs::rename(&staging, &path).map_err(io_error(&path))?;
        debug!("Saved diagram {:?} to {}", key, path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> StorageResult<DiagramState> {
        let path = self.path_for(key);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StorageError::NotFound(key.to_string())),
            Err(e) => return Err(io_error(&path)(e)),
        };
        let state = DiagramState::from_json(&json)?;
        debug!("Loaded diagram {:?} from {}", key, path.display());
        Ok(state)
    }

    fn delete(&self, key: &str) -> StorageResult<bool> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted diagram {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(io_error(&self.root))?;
        let mut keys: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &str) -> StorageResult<bool> {
        Ok(self.path_for(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::Diagram;
    use crate::geometry::Rect;
    use crate::registry::StencilSet;
    use tempfile::tempdir;

    fn sample() -> DiagramState {
        let registry = StencilSet::with_defaults();
        let mut diagram = Diagram::new(640.0, 480.0);
        diagram
            .add_stencil(&registry, "ellipse", Rect::new(10.0, 10.0, 60.0, 40.0))
            .unwrap();
        diagram.capture()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.save("flow", &sample()).unwrap();
        assert_eq!(storage.load("flow").unwrap(), sample());
        assert!(!dir.path().join("flow.json.tmp").exists());
    }

    #[test]
    fn test_missing_and_corrupt() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        assert!(matches!(storage.load("nope"), Err(StorageError::NotFound(_))));
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(storage.load("broken"), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_keys_skip_other_files() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();
        fs::write(storage.root().join("notes.txt"), "ignored").unwrap();
        storage.save("b", &sample()).unwrap();
        storage.save("a", &sample()).unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);

        assert!(storage.delete("a").unwrap());
        assert!(!storage.delete("a").unwrap());
        assert!(!storage.contains("a").unwrap());
        assert!(storage.contains("b").unwrap());
    }

    #[test]
    fn test_key_is_sanitized() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        storage.save("team/flow:v2", &sample()).unwrap();
        assert!(dir.path().join("team_flow_v2.json").exists());
        assert!(storage.load("team/flow:v2").is_ok());
    }
}
