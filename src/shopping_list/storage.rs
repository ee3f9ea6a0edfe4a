use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::ShoppingListError;

/// A single persisted slot holding the serialized shopping list.
pub trait ListStorage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, ShoppingListError>;
    fn save(&self, contents: &str) -> Result<(), ShoppingListError>;
}

/// Stores the list as one JSON file.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, ShoppingListError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, contents: &str) -> Result<(), ShoppingListError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // The slot is replaced whole, never written in place.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory slot. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or_default()
    }
}

impl ListStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, ShoppingListError> {
        Ok(self.contents())
    }

    fn save(&self, contents: &str) -> Result<(), ShoppingListError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ShoppingListError::Storage("memory slot poisoned".to_string()))?;
        *slot = Some(contents.to_string());
        Ok(())
    }
}
