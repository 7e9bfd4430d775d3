//! Atomic JSON document files.
//!
//! A `JsonDocument` is one named JSON file that is always read and written
//! as a whole: there is no partial update or merge, every save rewrites the
//! complete document.

use parley_core::error::{ParleyError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to a JSON document on disk.
///
/// Provides:
/// - **Atomicity**: Saves go through a tmp file + atomic rename
/// - **Durability**: Explicit fsync before rename
/// - **Isolation**: `update` holds an exclusive file lock around load-mutate-save
///
/// Text is written as UTF-8 without escaping, so non-ASCII content stays
/// human-readable in the file.
pub struct JsonDocument<T> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonDocument<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for JsonDocument<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDocument")
            .field("path", &self.path)
            .finish()
    }
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new document handle. Nothing is touched on disk.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read, or the content is malformed
    pub fn read(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content).map_err(|e| ParleyError::Serialization {
            format: "JSON".to_string(),
            message: format!("{}: {}", self.path.display(), e),
        })?;
        Ok(Some(data))
    }

    /// Loads the document, writing `default` first if the file is absent.
    pub fn load(&self, default: T) -> Result<T> {
        match self.read()? {
            Some(data) => Ok(data),
            None => {
                self.save(&default)?;
                Ok(default)
            }
        }
    }

    /// Serializes `data` and replaces the file in full.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Performs a locked load-mutate-save.
    ///
    /// `f` receives the current document (or `default` if the file is
    /// absent). If it returns `Ok`, the document is written back; on `Err`
    /// the file is left untouched.
    pub fn update<R, F>(&self, default: T, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> Result<R>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.read()?.unwrap_or(default);
        let result = f(&mut data)?;
        self.save(&data)?;

        Ok(result)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| ParleyError::io(format!("Path has no file name: {:?}", self.path)))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(self.path.with_file_name(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
///
/// The lock file itself stays on disk: removing it would let a waiter and a
/// newcomer lock two different inodes at once.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| ParleyError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    type Doc = BTreeMap<String, String>;

    fn document(dir: &TempDir) -> JsonDocument<Doc> {
        JsonDocument::new(dir.path().join("doc.json"))
    }

    #[test]
    fn test_load_writes_default_when_absent() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);

        let mut default = Doc::new();
        default.insert("k".into(), "v".into());

        let loaded = doc.load(default.clone()).unwrap();
        assert_eq!(loaded, default);
        assert!(doc.path().exists());
        assert_eq!(doc.read().unwrap(), Some(default));
    }

    #[test]
    fn test_unicode_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);

        let mut data = Doc::new();
        data.insert("pt".into(), "Olá, conversação!".into());
        data.insert("ja".into(), "こんにちは世界".into());
        data.insert("emoji".into(), "🦀 rust".into());

        doc.save(&data).unwrap();
        assert_eq!(doc.load(Doc::new()).unwrap(), data);

        let raw = fs::read_to_string(doc.path()).unwrap();
        assert!(raw.contains("こんにちは世界"));
        assert!(raw.contains("Olá"));
    }

    #[test]
    fn test_malformed_content_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);
        fs::write(doc.path(), "{ this is not json").unwrap();

        let err = doc.load(Doc::new()).unwrap_err();
        assert!(matches!(err, ParleyError::Serialization { .. }));

        // The malformed file is not replaced by the default.
        assert_eq!(
            fs::read_to_string(doc.path()).unwrap(),
            "{ this is not json"
        );
    }

    #[test]
    fn test_update_applies_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);

        let len = doc
            .update(Doc::new(), |data| {
                data.insert("a".into(), "1".into());
                Ok(data.len())
            })
            .unwrap();
        assert_eq!(len, 1);

        doc.update(Doc::new(), |data| {
            data.insert("b".into(), "2".into());
            Ok(())
        })
        .unwrap();

        let loaded = doc.read().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_failed_update_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);

        let mut data = Doc::new();
        data.insert("keep".into(), "me".into());
        doc.save(&data).unwrap();

        let result: Result<()> = doc.update(Doc::new(), |data| {
            data.clear();
            Err(ParleyError::invalid_request("nope"))
        });
        assert!(result.is_err());
        assert_eq!(doc.read().unwrap(), Some(data));
    }

    #[test]
    fn test_lock_file_outlives_update() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);
        let lock_path = temp_dir.path().join("doc.lock");

        doc.update(Doc::new(), |data| {
            data.insert("a".into(), "1".into());
            Ok(())
        })
        .unwrap();
        assert!(lock_path.exists());

        // The same lock file is reused by the next holder.
        doc.update(Doc::new(), |data| {
            data.insert("b".into(), "2".into());
            Ok(())
        })
        .unwrap();
        assert!(lock_path.exists());
        assert_eq!(doc.read().unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_clone_points_at_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);
        let copy = doc.clone();

        let mut data = Doc::new();
        data.insert("k".into(), "v".into());
        doc.save(&data).unwrap();

        assert_eq!(copy.path(), doc.path());
        assert_eq!(copy.read().unwrap(), Some(data));
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let doc = document(&temp_dir);

        doc.save(&Doc::new()).unwrap();

        assert!(!temp_dir.path().join(".doc.json.tmp").exists());
        assert!(!temp_dir.path().join("doc.lock").exists());
        assert!(doc.path().exists());
    }
}
