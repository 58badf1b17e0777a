//! Durable key-value slots.

use super::error::StorageError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Whether `key` contains a path separator and so cannot be a file name.
pub fn has_path_separator(key: &str) -> bool {
    key.contains(['/', '\\'])
}

/// String-valued storage addressed by key.
///
/// `set` takes `&self` so a slot can be shared between the gateway that
/// writes it and whoever inspects it.
pub trait KeyValueSlot {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process slot.
///
/// Clones share the same map, so a clone handed to a second store sees
/// everything the first one wrote. That makes it a stand-in for storage
/// that outlives a single session.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the value under `key`, returning it if present.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.borrow_mut().remove(key)
    }
}

impl KeyValueSlot for MemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed slot storing each key as `<dir>/<key>.json`.
///
/// Keys containing a path separator are rejected with
/// [`StorageError::InvalidKey`], so every file stays inside `dir`.
///
/// Writes go to a temporary file first and are renamed into place, so an
/// interrupted write leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn checked_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || has_path_separator(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.path_for(key))
    }
}

impl KeyValueSlot for FileSlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.checked_path(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.checked_path(key)?;
        fs::create_dir_all(&self.dir)?;

        let temp_path = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&temp_path, value).and_then(|()| fs::rename(&temp_path, &path)) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}
