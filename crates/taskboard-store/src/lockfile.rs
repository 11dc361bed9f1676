use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive writer lock on one data file.
///
/// Holding the guard means no other process is between reading and
/// rewriting `<target>`: the `<target>.lock` marker is created with
/// create-new semantics and removed on drop. Writes go to a temp file in the
/// same directory and are renamed over the target.
pub struct Lockfile {
    target: PathBuf,
    lock_path: PathBuf,
}

impl Lockfile {
    pub fn acquire(target: impl AsRef<Path>) -> Result<Self, StoreError> {
        let target = target.as_ref().to_path_buf();
        let lock_path = lock_path_for(&target);

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(_) => {
                tracing::trace!(lock = %lock_path.display(), "lock acquired");
                Ok(Self { target, lock_path })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(StoreError::LockConflict(lock_path.display().to_string()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Read the current contents of the target, or `T::default()` if the
    /// file does not exist yet.
    pub fn read_json<T: DeserializeOwned + Default>(&self) -> Result<T, StoreError> {
        read_json_or_default(&self.target)
    }

    /// Atomically replace the target with `value` as pretty JSON.
    pub fn write_json<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(value)?;
        let parent = self
            .target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&data)?;
        tmp.flush()?;
        tmp.persist(&self.target).map_err(|e| StoreError::Io(e.error))?;
        tracing::debug!(file = %self.target.display(), bytes = data.len(), "snapshot written");
        Ok(())
    }
}

impl Drop for Lockfile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(target: &Path) -> PathBuf {
    target.with_extension(
        target
            .extension()
            .map(|e| format!("{}.lock", e.to_string_lossy()))
            .unwrap_or_else(|| "lock".to_string()),
    )
}

/// Unlocked read used by queries; a missing file reads as empty.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match fs::read(path) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(StoreError::Io(e)),
    }
}
