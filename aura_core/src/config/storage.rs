//! Where the settings blob lives.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{AuraError, AuraResult, ResultExt};

/// Persistence collaborator for the settings store.
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait ConfigStorage {
    fn load(&self) -> AuraResult<Option<String>>;
    fn save(&self, blob: &str) -> AuraResult<()>;
}

/// Settings persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<config_dir>/aura/settings.json`, or `.aura/settings.json` when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("aura"))
            .unwrap_or_else(|| PathBuf::from(".aura"))
            .join("settings.json")
    }

    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStorage for JsonFileStorage {
    fn load(&self) -> AuraResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(&self.path).with_file_context(&self.path.display().to_string())?;
        Ok(Some(content))
    }

    fn save(&self, blob: &str) -> AuraResult<()> {
        let path = self.path.display().to_string();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_file_context(&path)?;
            }
        }
        fs::write(&self.path, blob).with_file_context(&path)?;
        Ok(())
    }
}

/// In-process storage. Clones share the same blob.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Rc<RefCell<Option<String>>>,
    failing: Rc<Cell<bool>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        let storage = Self::default();
        *storage.blob.borrow_mut() = Some(blob.into());
        storage
    }

    /// Makes every subsequent `load` and `save` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn contents(&self) -> Option<String> {
        self.blob.borrow().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ConfigStorage for MemoryStorage {
    fn load(&self) -> AuraResult<Option<String>> {
        if self.failing.get() {
            return Err::<Option<String>, _>(AuraError::Storage("memory storage unavailable".into()))
                .with_storage_context("load");
        }
        Ok(self.blob.borrow().clone())
    }

    fn save(&self, blob: &str) -> AuraResult<()> {
        if self.failing.get() {
            return Err::<(), _>(AuraError::Storage("memory storage unavailable".into()))
                .with_storage_context("save");
        }
        *self.blob.borrow_mut() = Some(blob.to_string());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
