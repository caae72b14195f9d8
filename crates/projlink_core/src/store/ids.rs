//! Id generation capability.
//!
//! The store asks a generator for candidates and rejects ones already in use,
//! so generators only need to be "probably unique".

use crate::model::project::ProjectId;
use uuid::Uuid;

/// Source of fresh entry ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> ProjectId;
}

/// Random v4 UUID ids; the production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> ProjectId {
        ProjectId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("entry")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> ProjectId {
        let id = ProjectId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> ProjectId,
{
    fn next_id(&mut self) -> ProjectId {
        self()
    }
}
