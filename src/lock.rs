use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use fs2::FileExt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    #[error("Another instance of {} is already running", crate::APP_NAME)]
    AlreadyRunning,
    #[error("Cannot open lock file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Exclusive single-instance lock, released on drop.
#[derive(Debug)]
pub struct ProcessLock {
    file: File,
}

impl ProcessLock {
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        let io_err = |source| LockError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(io_err)?;

        file.try_lock_exclusive().map_err(|_| LockError::AlreadyRunning)?;
        log::trace!("Acquired process lock {}", path.display());

        Ok(Self { file })
    }
}

impl Drop for ProcessLock {
    // The file stays on disk; unlinking it would let two instances lock
    // different inodes of the same path.
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Lock file location: the user runtime dir where the platform has one,
/// otherwise the temp dir.
pub fn default_lock_path() -> PathBuf {
    let file_name = format!("{}.lock", crate::APP_NAME);
    ProjectDirs::from("", "", crate::APP_NAME)
        .and_then(|dirs| dirs.runtime_dir().map(|d| d.join(&file_name)))
        .unwrap_or_else(|| std::env::temp_dir().join(file_name))
}
