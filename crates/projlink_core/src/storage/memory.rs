//! In-memory blob storage.
//!
//! Clones share one underlying slot, so a test can hand one handle to the
//! store and keep another to inspect or corrupt what was persisted.

use super::{BlobStorage, StorageError, StorageResult};
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStorage {
    slot: Rc<RefCell<Option<String>>>,
    writes: Rc<Cell<usize>>,
    fail_writes: Rc<Cell<bool>>,
}

impl MemoryBlobStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an existing blob, as if a previous session wrote it.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.set_blob(Some(blob.into()));
        storage
    }

    pub fn blob(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn set_blob(&self, blob: Option<String>) {
        *self.slot.borrow_mut() = blob;
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Makes subsequent writes fail with an io error until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl BlobStorage for MemoryBlobStorage {
    fn read(&self) -> StorageResult<Option<String>> {
        Ok(self.blob())
    }

    fn write(&mut self, blob: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::Other,
                "memory storage write rejected",
            )));
        }
        self.set_blob(Some(blob.to_string()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
