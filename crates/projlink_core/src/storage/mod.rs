//! Persisted blob capability and its backends.
//!
//! # Responsibility
//! - Define the whole-value read/overwrite contract the store persists through.
//! - Provide in-memory, single-file and SQLite key-value implementations.
//!
//! # Invariants
//! - `read` returns `None` when nothing was ever written, never an empty blob.
//! - `write` replaces the whole value; there are no partial/delta writes.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileBlobStorage;
pub use memory::MemoryBlobStorage;
pub use sqlite::SqliteBlobStorage;

/// Default key the collection is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "projectLinks";

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading or writing the persisted blob.
#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Db(DbError),
    /// Connection is not migrated for key-value storage.
    MissingTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingTable(table) => write!(f, "storage table `{table}` is missing"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingTable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Whole-value blob persistence.
pub trait BlobStorage {
    /// Reads the current blob, `None` when absent.
    fn read(&self) -> StorageResult<Option<String>>;
    /// Overwrites the blob.
    fn write(&mut self, blob: &str) -> StorageResult<()>;
    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;
}

impl<T: BlobStorage + ?Sized> BlobStorage for Box<T> {
    fn read(&self) -> StorageResult<Option<String>> {
        (**self).read()
    }

    fn write(&mut self, blob: &str) -> StorageResult<()> {
        (**self).write(blob)
    }

    fn backend(&self) -> &'static str {
        (**self).backend()
    }
}
