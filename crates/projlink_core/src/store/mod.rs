//! Project store: the in-memory collection and its persistence loop.
//!
//! # Responsibility
//! - Own the authoritative entry list and every mutation path into it.
//! - Keep storage and id generation behind injected capabilities.

pub mod ids;
pub mod project_store;
