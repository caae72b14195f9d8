//! Stateless search/kind filtering over the entry list.
//!
//! # Invariants
//! - Filtering is order-preserving and never mutates its input.
//! - Matching is case-insensitive substring over title, description and tags.
//! - The term is matched literally; only an empty term matches every entry.

use crate::model::project::{ProjectEntry, ProjectKind};

/// Returns whether `entry` matches an already-lowercased search term.
fn matches_term(entry: &ProjectEntry, needle: &str) -> bool {
    needle.is_empty()
        || entry.title.to_lowercase().contains(needle)
        || entry.description.to_lowercase().contains(needle)
        || entry
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

fn normalize_term(term: &str) -> String {
    term.to_lowercase()
}

/// Entries matching `term`, restricted to `kind` when given.
pub fn filter_entries<'a>(
    entries: &'a [ProjectEntry],
    term: &str,
    kind: Option<ProjectKind>,
) -> Vec<&'a ProjectEntry> {
    let needle = normalize_term(term);
    entries
        .iter()
        .filter(|entry| kind.map_or(true, |kind| entry.kind == kind))
        .filter(|entry| matches_term(entry, &needle))
        .collect()
}

/// Per-tab badge counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub all: usize,
    pub project: usize,
    pub webapp: usize,
}

impl KindCounts {
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a ProjectEntry>) -> Self {
        entries
            .into_iter()
            .fold(Self::default(), |mut counts, entry| {
                counts.all += 1;
                match entry.kind {
                    ProjectKind::Project => counts.project += 1,
                    ProjectKind::Webapp => counts.webapp += 1,
                }
                counts
            })
    }

    pub fn for_kind(&self, kind: Option<ProjectKind>) -> usize {
        match kind {
            None => self.all,
            Some(ProjectKind::Project) => self.project,
            Some(ProjectKind::Webapp) => self.webapp,
        }
    }
}
