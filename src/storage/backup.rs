use chrono::Utc;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("couldn't read {path} for backup: {source}")]
    ReadSource { path: PathBuf, source: io::Error },
    #[error("couldn't create backup file {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to copy into backup file {path}: {source}")]
    Copy { path: PathBuf, source: io::Error },
}

/// Copy `source` into a new file under `backup_dir` and return its path.
///
/// Names look like `programs.json-20261019T093000-<uuid>`; the file is
/// created with create-new semantics so an existing backup is never touched.
pub fn backup(source: &Path, backup_dir: &Path) -> Result<PathBuf, BackupError> {
    let mut src = File::open(source).map_err(|e| BackupError::ReadSource {
        path: source.to_path_buf(),
        source: e,
    })?;

    let path = backup_dir.join(backup_name(source));
    let mut dst = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| BackupError::Create {
            path: path.clone(),
            source: e,
        })?;

    let copied = io::copy(&mut src, &mut dst).and_then(|_| dst.sync_all());
    if let Err(e) = copied {
        drop(dst);
        let _ = fs::remove_file(&path);
        return Err(BackupError::Copy { path, source: e });
    }

    Ok(path)
}

fn backup_name(source: &Path) -> String {
    let stem = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    format!(
        "{stem}-{}-{}",
        Utc::now().format("%Y%m%dT%H%M%S"),
        Uuid::new_v4().simple()
    )
}
