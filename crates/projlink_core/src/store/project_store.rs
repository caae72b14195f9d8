//! Owned project collection synchronized with persisted storage.
//!
//! # Responsibility
//! - Hold the canonical, insertion-ordered list of entries.
//! - Validate create/update input and assign ids.
//! - Re-serialize and overwrite the persisted blob after every mutation.
//! - Notify subscribers after each committed mutation.
//!
//! # Invariants
//! - Ids are unique across the collection at all times.
//! - `title` and `url` are non-empty for every held entry.
//! - Display order equals creation order; updates keep position.
//! - A failed write rolls memory back; listeners only see committed changes.

use crate::model::project::{ProjectEntry, ProjectFields, ProjectId, ProjectKind, ValidationError};
use crate::storage::{BlobStorage, StorageError};
use crate::store::ids::{IdGenerator, UuidIdGenerator};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const MAX_ID_ATTEMPTS: usize = 8;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error taxonomy for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Required field missing on create/update.
    Validation(ValidationError),
    /// Update targeted an id the store does not hold.
    NotFound(ProjectId),
    /// Persisted blob could not be decoded into a valid collection.
    CorruptBlob(String),
    /// Reading or writing the blob failed.
    Storage(StorageError),
    /// The collection could not be serialized.
    Encode(serde_json::Error),
    /// The id generator kept returning ids already in use.
    IdExhausted { attempts: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::CorruptBlob(reason) => write!(f, "persisted project data is corrupt: {reason}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode projects: {err}"),
            Self::IdExhausted { attempts } => {
                write!(f, "could not generate a unique id after {attempts} attempts")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_) | Self::CorruptBlob(_) | Self::IdExhausted { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Committed mutation, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Created(ProjectId),
    Updated(ProjectId),
    Deleted(ProjectId),
}

/// How the initial collection was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// No blob existed yet.
    Empty,
    /// Blob decoded into `count` entries.
    Loaded { count: usize },
    /// Blob was corrupt; the store started empty instead.
    ResetAfterCorruption { reason: String },
}

impl LoadReport {
    /// True when the collection is a fallback rather than what was persisted.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::ResetAfterCorruption { .. })
    }
}

type Listener = Box<dyn FnMut(&StoreChange)>;

/// Canonical entry collection with injected persistence and id capabilities.
pub struct ProjectStore<S: BlobStorage, G: IdGenerator = UuidIdGenerator> {
    storage: S,
    ids: G,
    entries: Vec<ProjectEntry>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl<S: BlobStorage> ProjectStore<S> {
    /// Loads with random UUID ids.
    pub fn open(storage: S) -> StoreResult<Self> {
        Self::load(storage, UuidIdGenerator)
    }
}

impl<S: BlobStorage, G: IdGenerator> ProjectStore<S, G> {
    /// Loads the persisted collection.
    ///
    /// # Errors
    /// - `CorruptBlob` when the blob does not decode or breaks invariants.
    /// - `Storage` when the backend cannot be read.
    pub fn load(storage: S, ids: G) -> StoreResult<Self> {
        let started_at = Instant::now();
        match read_entries(&storage) {
            Ok(entries) => {
                info!(
                    "event=store_load module=store status=ok backend={} count={} duration_ms={}",
                    storage.backend(),
                    entries.as_ref().map_or(0, Vec::len),
                    started_at.elapsed().as_millis()
                );
                Ok(Self::from_parts(storage, ids, entries.unwrap_or_default()))
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error backend={} duration_ms={} error={}",
                    storage.backend(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Loads the persisted collection, starting empty if the blob is corrupt.
    ///
    /// The corrupt blob stays in storage until the next mutation overwrites
    /// it. Storage read failures are still returned.
    pub fn load_or_reset(storage: S, ids: G) -> StoreResult<(Self, LoadReport)> {
        match read_entries(&storage) {
            Ok(None) => {
                info!(
                    "event=store_load module=store status=ok backend={} count=0 blob=absent",
                    storage.backend()
                );
                Ok((Self::from_parts(storage, ids, Vec::new()), LoadReport::Empty))
            }
            Ok(Some(entries)) => {
                let count = entries.len();
                info!(
                    "event=store_load module=store status=ok backend={} count={}",
                    storage.backend(),
                    count
                );
                Ok((
                    Self::from_parts(storage, ids, entries),
                    LoadReport::Loaded { count },
                ))
            }
            Err(StoreError::CorruptBlob(reason)) => {
                warn!(
                    "event=store_load module=store status=reset backend={} error_code=corrupt_blob",
                    storage.backend()
                );
                Ok((
                    Self::from_parts(storage, ids, Vec::new()),
                    LoadReport::ResetAfterCorruption { reason },
                ))
            }
            Err(err) => Err(err),
        }
    }

    fn from_parts(storage: S, ids: G, entries: Vec<ProjectEntry>) -> Self {
        Self {
            storage,
            ids,
            entries,
            revision: 0,
            listeners: Vec::new(),
        }
    }

    /// Validates, assigns a fresh id, appends and persists.
    pub fn create(&mut self, fields: ProjectFields) -> StoreResult<ProjectEntry> {
        let fields = fields
            .into_validated()
            .map_err(|err| rejected("project_create", err))?;
        let id = self.fresh_id()?;
        let entry = ProjectEntry::from_fields(id, fields);

        self.entries.push(entry.clone());
        if let Err(err) = self.persist() {
            self.entries.pop();
            return Err(write_failed("project_create", &entry.id, err));
        }

        info!(
            "event=project_create module=store status=ok id={} kind={} tags={}",
            entry.id,
            entry.kind,
            entry.tags.len()
        );
        self.commit(StoreChange::Created(entry.id.clone()));
        Ok(entry)
    }

    /// Replaces every field of an existing entry in place.
    pub fn update(&mut self, id: &ProjectId, fields: ProjectFields) -> StoreResult<ProjectEntry> {
        let fields = fields
            .into_validated()
            .map_err(|err| rejected("project_update", err))?;
        let Some(index) = self.position(id) else {
            warn!("event=project_update module=store status=error error_code=not_found id={id}");
            return Err(StoreError::NotFound(id.clone()));
        };

        let updated = ProjectEntry::from_fields(id.clone(), fields);
        let previous = std::mem::replace(&mut self.entries[index], updated.clone());
        if let Err(err) = self.persist() {
            self.entries[index] = previous;
            return Err(write_failed("project_update", id, err));
        }

        info!(
            "event=project_update module=store status=ok id={} kind={} tags={}",
            id,
            updated.kind,
            updated.tags.len()
        );
        self.commit(StoreChange::Updated(id.clone()));
        Ok(updated)
    }

    /// Removes the entry if present and persists either way.
    ///
    /// Returns whether an entry was removed. Missing ids are not an error.
    pub fn delete(&mut self, id: &ProjectId) -> StoreResult<bool> {
        let removed = self
            .position(id)
            .map(|index| (index, self.entries.remove(index)));

        if let Err(err) = self.persist() {
            if let Some((index, entry)) = removed {
                self.entries.insert(index, entry);
            }
            return Err(write_failed("project_delete", id, err));
        }

        match removed {
            Some(_) => {
                info!("event=project_delete module=store status=ok id={id}");
                self.commit(StoreChange::Deleted(id.clone()));
                Ok(true)
            }
            None => {
                debug!("event=project_delete module=store status=noop id={id}");
                Ok(false)
            }
        }
    }

    /// Current collection in insertion order.
    pub fn list(&self) -> &[ProjectEntry] {
        &self.entries
    }

    pub fn get(&self, id: &ProjectId) -> Option<&ProjectEntry> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_by_kind(&self, kind: ProjectKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    /// Incremented on every committed mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a listener called after every committed mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, id: &ProjectId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.id == id)
    }

    fn fresh_id(&mut self) -> StoreResult<ProjectId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if self.position(&candidate).is_none() {
                return Ok(candidate);
            }
            debug!("event=id_collision module=store id={candidate}");
        }
        Err(StoreError::IdExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn persist(&mut self) -> StoreResult<()> {
        let blob = serde_json::to_string(&self.entries).map_err(StoreError::Encode)?;
        self.storage.write(&blob)?;
        Ok(())
    }

    fn commit(&mut self, change: StoreChange) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener(&change);
        }
    }
}

/// Decodes a persisted blob into a validated collection.
pub fn decode_entries(blob: &str) -> StoreResult<Vec<ProjectEntry>> {
    let entries: Vec<ProjectEntry> =
        serde_json::from_str(blob).map_err(|err| StoreError::CorruptBlob(err.to_string()))?;

    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|err| StoreError::CorruptBlob(format!("entry {index}: {err}")))?;
        if entry.tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(StoreError::CorruptBlob(format!("entry {index}: blank tag")));
        }
        if !seen.insert(entry.id.as_str()) {
            return Err(StoreError::CorruptBlob(format!(
                "entry {index}: duplicate id `{}`",
                entry.id
            )));
        }
    }
    Ok(entries)
}

fn read_entries<S: BlobStorage>(storage: &S) -> StoreResult<Option<Vec<ProjectEntry>>> {
    match storage.read()? {
        Some(blob) => decode_entries(&blob).map(Some),
        None => Ok(None),
    }
}

fn rejected(event: &str, err: ValidationError) -> StoreError {
    let missing: Vec<&str> = err.missing.iter().map(|field| field.as_str()).collect();
    warn!(
        "event={} module=store status=rejected error_code=validation missing={}",
        event,
        missing.join(",")
    );
    StoreError::Validation(err)
}

fn write_failed(event: &str, id: &ProjectId, err: StoreError) -> StoreError {
    error!(
        "event={} module=store status=error error_code=persist_failed id={} error={}",
        event, id, err
    );
    err
}
