//! Presentation-level projections over the store.
//!
//! Nothing here mutates the store.

pub mod filter;
pub mod project_view;
