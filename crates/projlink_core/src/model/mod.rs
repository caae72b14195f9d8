//! Domain model for recorded project links.
//!
//! # Responsibility
//! - Define the single entity (`ProjectEntry`) and its mutable field set.
//! - Own field normalization and required-field validation.
//!
//! # Invariants
//! - Every entry is identified by a stable `ProjectId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod project;
