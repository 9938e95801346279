//! Atomic JSON file operations.
//!
//! Writes go to a sibling temp file, are fsynced, then renamed over the
//! target so a crash never leaves a half-written store.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use acure_core::{AcureError, Result};
use serde::{Serialize, de::DeserializeOwned};

/// A handle to a JSON file replaced atomically on every save.
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// Returns `Ok(None)` when the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Serializes `data` and atomically replaces the file.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AcureError::io("Path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| AcureError::io("Path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}
