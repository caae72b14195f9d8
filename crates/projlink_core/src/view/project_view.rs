//! Pull-based presentation projection of the store.
//!
//! The view holds only presentation state (search term, active tab). It
//! never caches entries; callers ask for a fresh `ViewSnapshot` after a
//! store change and render that.

use crate::model::project::{ProjectEntry, ProjectKind};
use crate::storage::BlobStorage;
use crate::store::ids::IdGenerator;
use crate::store::project_store::ProjectStore;
use crate::view::filter::{filter_entries, KindCounts};
use std::fmt::{Display, Formatter};

/// Tab selector over entry kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewTab {
    #[default]
    All,
    Projects,
    Webapps,
}

impl ViewTab {
    pub fn kind(self) -> Option<ProjectKind> {
        match self {
            Self::All => None,
            Self::Projects => Some(ProjectKind::Project),
            Self::Webapps => Some(ProjectKind::Webapp),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Projects => "Projects",
            Self::Webapps => "Web Apps",
        }
    }
}

impl Display for ViewTab {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Presentation state: what the user typed and which tab is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectView {
    pub search_term: String,
    pub tab: ViewTab,
}

/// One render's worth of derived data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot<'a> {
    /// Entries matching the search term and active tab, in store order.
    pub visible: Vec<&'a ProjectEntry>,
    /// Badge counts over the search-filtered list, ignoring the tab.
    pub counts: KindCounts,
    /// Store holds nothing at all.
    pub collection_empty: bool,
    /// A search term is set and nothing matched it.
    pub no_matches: bool,
    /// Store revision this snapshot was derived from.
    pub revision: u64,
}

impl ProjectView {
    pub fn new(search_term: impl Into<String>, tab: ViewTab) -> Self {
        Self {
            search_term: search_term.into(),
            tab,
        }
    }

    /// Recomputes the projection from the store's current list.
    pub fn snapshot<'a, S, G>(&self, store: &'a ProjectStore<S, G>) -> ViewSnapshot<'a>
    where
        S: BlobStorage,
        G: IdGenerator,
    {
        let searched = filter_entries(store.list(), &self.search_term, None);
        let counts = KindCounts::tally(searched.iter().copied());
        let visible: Vec<&ProjectEntry> = match self.tab.kind() {
            None => searched,
            Some(kind) => searched
                .into_iter()
                .filter(|entry| entry.kind == kind)
                .collect(),
        };

        ViewSnapshot {
            visible,
            counts,
            collection_empty: store.is_empty(),
            no_matches: counts.all == 0 && !self.search_term.is_empty(),
            revision: store.revision(),
        }
    }
}
