/// Local filesystem storage backend.
///
/// One JSON file per key under a root directory:
/// - File name is the percent-encoded key plus `.json`
/// - Atomic writes (write to .tmp, fsync, rename, fsync directory)
/// - Identical content is not rewritten
/// - Mutex-guarded writes to prevent interleaved modification
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::{KeyValueStore, StorageError};

/// Everything except ASCII alphanumerics, `-` and `_` is escaped, so a key
/// can never name a path outside the root.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

const FILE_EXTENSION: &str = "json";

pub struct LocalStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File that holds the value for `key`.
    pub fn path_for_key(&self, key: &str) -> PathBuf {
        let encoded = percent_encode(key.as_bytes(), KEY_ENCODE_SET).to_string();
        self.root.join(format!("{}.{}", encoded, FILE_EXTENSION))
    }

    fn write_synced(tmp_path: &Path, content: &str) -> Result<(), std::io::Error> {
        let mut file = fs::File::create(tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    }

    fn read_existing(path: &Path) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomic write with fsync: write to .tmp, fsync, rename, fsync directory.
    /// The temp file is removed if any step before the rename fails.
    fn atomic_write(path: &Path, content: &str) -> Result<(), std::io::Error> {
        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = Self::write_synced(&tmp_path, content) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        // fsync directory for rename durability
        if let Some(dir) = path.parent() {
            if let Ok(d) = fs::File::open(dir) {
                let _ = d.sync_all();
            }
        }
        Ok(())
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::read_existing(&self.path_for_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.path_for_key(key);

        if let Some(existing) = Self::read_existing(&path)? {
            // Non-empty-to-empty protection
            if value.trim().is_empty() && !existing.trim().is_empty() {
                return Err(StorageError::EmptyWrite(key.to_string()));
            }
            if existing == value {
                log::debug!("[kanban.storage.local] Skipping identical write for {}", key);
                return Ok(());
            }
        }

        Self::atomic_write(&path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(self.path_for_key(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
