//! Durable storage for the widget configuration
//!
//! Stores know nothing about widget semantics: they turn a [`HudConfig`]
//! into bytes and back. [`JsonConfigStore`] keeps the document at a fixed
//! path with atomic writes; [`MemoryConfigStore`] keeps it in memory for
//! embedding and tests.

use crate::config::models::HudConfig;
use crate::error::StoreError;
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Reads and writes the whole configuration document
pub trait ConfigStore: Send + Sync {
    /// Load the stored document
    ///
    /// A store that does not exist yet yields [`HudConfig::default`]; a store
    /// that exists but cannot be parsed yields [`StoreError::Corrupt`].
    fn load(&self) -> StoreResult<HudConfig>;

    /// Replace the stored document
    ///
    /// After a failed save the previous document must still be readable.
    fn save(&self, config: &HudConfig) -> StoreResult<()>;

    /// Human readable location for logs and error messages
    fn describe(&self) -> String;
}

impl<T: ConfigStore + ?Sized> ConfigStore for Arc<T> {
    fn load(&self) -> StoreResult<HudConfig> {
        (**self).load()
    }

    fn save(&self, config: &HudConfig) -> StoreResult<()> {
        (**self).save(config)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    fn load(&self) -> StoreResult<HudConfig> {
        (**self).load()
    }

    fn save(&self, config: &HudConfig) -> StoreResult<()> {
        (**self).save(config)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// JSON document at a fixed path
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    /// Store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the well-known location
    ///
    /// See [`crate::utils::paths::store_path`].
    pub fn at_default_location() -> Self {
        Self::new(crate::utils::paths::store_path())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> StoreResult<HudConfig> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Configuration store {} not found, using defaults",
                    self.path.display()
                );
                return Ok(HudConfig::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let config: HudConfig =
            serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        info!(
            "Configuration loaded from {} ({} widget sets)",
            self.path.display(),
            config.widget_sets.len()
        );
        Ok(config)
    }

    /// Atomic write: serialize into a temporary file in the same directory,
    /// flush it to disk, then rename it over the store.
    fn save(&self, config: &HudConfig) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let json = serde_json::to_string_pretty(config).map_err(StoreError::Serialize)?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        temp.write_all(json.as_bytes())
            .map_err(|e| self.write_error(e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| self.write_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        debug!("Configuration saved to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store holding the serialized document
///
/// Documents go through the same JSON encoding as [`JsonConfigStore`], so
/// anything that survives this store survives the file store. Writes can be
/// made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    document: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl MemoryConfigStore {
    /// Empty store; loads yield the default document
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with raw document text
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(json.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent saves fail (`true`) or succeed (`false`)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw stored document, if any save has happened
    pub fn document(&self) -> Option<String> {
        self.document.lock().clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> StoreResult<HudConfig> {
        match self.document.lock().as_deref() {
            None => Ok(HudConfig::default()),
            Some(json) => serde_json::from_str(json).map_err(|source| StoreError::Corrupt {
                path: PathBuf::from(self.describe()),
                source,
            }),
        }
    }

    fn save(&self, config: &HudConfig) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                path: PathBuf::from(self.describe()),
                source: std::io::Error::other("writes disabled"),
            });
        }
        let json = serde_json::to_string(config).map_err(StoreError::Serialize)?;
        *self.document.lock() = Some(json);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::{Anchor, WidgetSet};
    use crate::test_utils::create_test_dir;

    fn sample_config() -> HudConfig {
        let mut config = HudConfig::default();
        config.widget_sets.push(WidgetSet::new("Top bar", Anchor::Center));
        config.preferences.debug_border = true;
        config
    }

    #[test]
    fn test_load_missing_store_yields_default() {
        let dir = create_test_dir();
        let store = JsonConfigStore::new(dir.path().join("widgets.json"));
        let config = store.load().unwrap();
        assert_eq!(config, HudConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = create_test_dir();
        let store = JsonConfigStore::new(dir.path().join("nested").join("widgets.json"));
        let config = sample_config();

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = create_test_dir();
        let store = JsonConfigStore::new(dir.path().join("widgets.json"));
        store.save(&sample_config()).unwrap();
        store.save(&HudConfig::default()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_corrupt_store_is_reported() {
        let dir = create_test_dir();
        let path = dir.path().join("widgets.json");
        std::fs::write(&path, "{\"widgetSets\": [ {").unwrap();

        let store = JsonConfigStore::new(&path);
        let error = store.load().unwrap_err();
        assert!(error.is_corrupt());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = create_test_dir();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = JsonConfigStore::new(blocker.join("widgets.json"));
        let error = store.save(&sample_config()).unwrap_err();
        assert!(matches!(error, StoreError::Write { .. }));
    }

    #[test]
    fn test_failed_save_keeps_previous_document() {
        let dir = create_test_dir();
        let path = dir.path().join("widgets.json");
        let store = JsonConfigStore::new(&path);
        let config = sample_config();
        store.save(&config).unwrap();

        // A directory squatting on the rename target makes the final step fail
        let squatter = JsonConfigStore::new(dir.path());
        assert!(squatter.save(&HudConfig::default()).is_err());

        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_memory_store_round_trip_and_failure() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.load().unwrap(), HudConfig::default());

        let config = sample_config();
        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), config);

        store.set_fail_writes(true);
        assert!(store.save(&HudConfig::default()).is_err());
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_memory_store_corrupt_document() {
        let store = MemoryConfigStore::with_document(r#"{"widgetSets": 5}"#);
        assert!(store.load().unwrap_err().is_corrupt());
    }
}
