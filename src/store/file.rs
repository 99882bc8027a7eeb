use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::StoreError;

use super::KeyValueStore;

/// Store backed by one JSON object file (`{"key": "text", ...}`).
///
/// The file is read once at open; each `set` rewrites it through a temp file
/// and rename before returning. Slots holding something other than a string
/// (hand edits) are handed to the reader as their JSON text.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    slots: RefCell<BTreeMap<String, Value>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let slots = match fs::read_to_string(&path) {
            Ok(json) if json.trim().is_empty() => BTreeMap::new(),
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| StoreError::Malformed(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Opened store {} ({} keys)", path.display(), slots.len());

        Ok(Self {
            path,
            slots: RefCell::new(slots),
        })
    }

    /// Default location under the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| {
            dir.join(crate::consts::APP_DIR_NAME)
                .join(crate::consts::STORE_FILE_NAME)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, slots: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(slots)
            .map_err(|e| StoreError::Rejected(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.borrow().get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.slots.borrow().clone();
        next.insert(key.to_string(), Value::String(value.to_string()));
        // Only adopt the new contents once they are on disk
        self.flush(&next)?;
        *self.slots.borrow_mut() = next;
        Ok(())
    }
}
