use super::backup::{BackupError, backup};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("couldn't read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("couldn't write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("write task did not finish: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// Outcome of a successful replace. The backup result is informational only.
#[derive(Debug)]
pub struct WriteReport {
    pub bytes: usize,
    pub backup: Result<PathBuf, BackupError>,
}

/// The catalog file plus the directory its backups go to.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    backup_dir: PathBuf,
    /// Held until the blocking write finishes, even if the caller goes away.
    write_lock: Arc<Mutex<()>>,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup_dir: backup_dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| StorageError::Read {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Back up the current file (best effort) and atomically replace it.
    pub async fn replace(&self, contents: Vec<u8>) -> Result<WriteReport, StorageError> {
        let guard = self.write_lock.clone().lock_owned().await;

        let path = self.path.clone();
        let backup_dir = self.backup_dir.clone();
        tokio::task::spawn_blocking(move || -> Result<WriteReport, StorageError> {
            let _guard = guard;
            let backup = backup(&path, &backup_dir);
            write_atomic(&path, &contents).map_err(|e| StorageError::Write {
                path: path.clone(),
                source: e,
            })?;

            Ok(WriteReport {
                bytes: contents.len(),
                backup,
            })
        })
        .await?
    }
}

/// Temp file in the same directory, fsync, rename over `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
