//! Core domain logic for ProjLink.
//! This crate is the single source of truth for project entry invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingStatus};
pub use model::project::{
    format_tags_input, parse_tags_input, ProjectEntry, ProjectFields, ProjectId, ProjectKind,
    RequiredField, ValidationError,
};
pub use storage::{
    BlobStorage, FileBlobStorage, MemoryBlobStorage, SqliteBlobStorage, StorageError,
    StorageResult, DEFAULT_STORAGE_KEY,
};
pub use store::ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use store::project_store::{
    decode_entries, LoadReport, ProjectStore, StoreChange, StoreError, StoreResult,
};
pub use view::filter::{filter_entries, KindCounts};
pub use view::project_view::{ProjectView, ViewSnapshot, ViewTab};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
