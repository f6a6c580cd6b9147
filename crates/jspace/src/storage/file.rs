//! JSON-file store, the on-disk counterpart of browser local storage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::storage::{PersistenceGateway, StorageError};

/// Store that keeps all values in one JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`. The file is created on
    /// first write.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn new(path: impl AsRef<Path>) -> Self {
        info!("Creating FileStore");
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_raw()? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Like `load`, but an unparsable file counts as empty so the next save
    /// replaces it.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let Some(content) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(error = %e, path = %self.path.display(), "Discarding unreadable store file");
            BTreeMap::new()
        }))
    }

    /// Writes to a sibling file first and renames it over the target, so a
    /// crash mid-write leaves the previous contents intact.
    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;

        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        std::fs::write(&staging, content)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl PersistenceGateway for FileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self.load()?.remove(key);
        debug!(found = value.is_some(), "Read key");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.load_for_update()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)?;
        debug!("Wrote key");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn reset(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        info!("Cleared file store");
        Ok(())
    }
}
