mod backup;
mod document;

pub use backup::{BackupError, backup};
pub use document::{DocumentStore, StorageError, WriteReport};
