//! Persistence backends for the settings store

use anyhow::{anyhow, Result};
use log::info;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Flat key -> JSON value map, as written to disk
pub type StoredValues = BTreeMap<String, Value>;

/// Storage for values that differ from the schema defaults
pub trait SettingsBackend {
    /// Load all stored values
    fn load(&self) -> Result<StoredValues>;

    /// Replace all stored values
    fn save(&self, values: &StoredValues) -> Result<()>;
}

/// Backend storing values as a pretty-printed JSON object in a single file
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load(&self) -> Result<StoredValues> {
        if !self.path.exists() {
            return Ok(StoredValues::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => {
                info!("Loaded settings from {:?}", self.path);
                Ok(map.into_iter().collect())
            }
            _ => Err(anyhow!("{:?} does not contain a JSON object", self.path)),
        }
    }

    fn save(&self, values: &StoredValues) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)?;
        info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// In-memory backend; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Rc<RefCell<StoredValues>>,
    saves: Rc<Cell<usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-existing stored values
    pub fn with_values(values: StoredValues) -> Self {
        Self {
            values: Rc::new(RefCell::new(values)),
            saves: Rc::new(Cell::new(0)),
        }
    }

    /// Snapshot of what is currently stored
    pub fn contents(&self) -> StoredValues {
        self.values.borrow().clone()
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<StoredValues> {
        Ok(self.values.borrow().clone())
    }

    fn save(&self, values: &StoredValues) -> Result<()> {
        *self.values.borrow_mut() = values.clone();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("shredder-backend-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = temp_path("settings.json");
        let backend = JsonFileBackend::new(&path);
        assert!(backend.load().unwrap().is_empty());

        let mut values = StoredValues::new();
        values.insert("traverse-hidden".to_string(), json!(true));
        values.insert("computation-size-range".to_string(), json!([1, 2]));
        backend.save(&values).unwrap();

        assert_eq!(backend.load().unwrap(), values);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_rejects_non_object() {
        let path = temp_path("array.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(JsonFileBackend::new(&path).load().is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_memory_backend_shares_storage() {
        let backend = MemoryBackend::new();
        let observer = backend.clone();

        let mut values = StoredValues::new();
        values.insert("a".to_string(), json!(1));
        backend.save(&values).unwrap();

        assert_eq!(observer.contents(), values);
        assert_eq!(observer.save_count(), 1);
    }
}
