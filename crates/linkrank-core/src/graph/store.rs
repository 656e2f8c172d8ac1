//! Immutable page/link graph built from ingested records.
//!
//! # Overview
//!
//! A [`Graph`] owns every [`Page`] and, for each page, the ordered list of
//! pages it links to. Pages are assigned dense indices in ingestion order
//! and the adjacency is stored in compressed sparse row form: an offset
//! array of length `pages + 1` and one flat array of `u32` link targets.
//! Memory is linear in `pages + links`, and a graph holds at most
//! `u32::MAX` pages.
//!
//! ## Integrity
//!
//! [`Graph::build`] rejects a repeated page id or title
//! ([`LoadError::DuplicateIdentity`]) and any link whose endpoint is not a
//! page ([`LoadError::UnknownReference`]). A graph is either fully built or
//! not returned at all.
//!
//! ## Multiplicity
//!
//! Links are not deduplicated. A pair listed twice appears twice in
//! [`Graph::outgoing_links`], counts twice toward in-degree and carries two
//! shares of rank mass.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::ErrorCode;

/// Page identifier as it appears in the corpus.
pub type PageId = u64;

/// Dense position of a page in ingestion order.
type DenseIndex = u32;

/// A page (graph node).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Page {
    /// Unique page id.
    pub id: PageId,
    /// Unique page title.
    pub title: String,
}

impl Page {
    #[must_use]
    pub fn new(id: PageId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// A directed hyperlink `from → to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Link {
    /// Linking page.
    pub from: PageId,
    /// Linked page.
    pub to: PageId,
}

impl Link {
    #[must_use]
    pub const fn new(from: PageId, to: PageId) -> Self {
        Self { from, to }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The identity that was repeated during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Id(PageId),
    Title(String),
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Title(title) => write!(f, "title {title:?}"),
        }
    }
}

/// Fatal integrity violations detected while building a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// A page id or title occurs more than once.
    #[error("duplicate page {0}")]
    DuplicateIdentity(Identity),

    /// A link endpoint does not name a loaded page.
    #[error("link {from} -> {to} references unknown page {missing}")]
    UnknownReference {
        from: PageId,
        to: PageId,
        missing: PageId,
    },

    /// More pages than a dense `u32` index can address.
    #[error("graph has {count} pages, more than a u32 index can address")]
    TooManyPages { count: usize },
}

impl LoadError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateIdentity(_) => ErrorCode::DuplicateIdentity,
            Self::UnknownReference { .. } => ErrorCode::UnknownReference,
            Self::TooManyPages { .. } => ErrorCode::GraphTooLarge,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Immutable page/link graph.
///
/// `Graph` is `Send + Sync`; share it by reference (or `Arc`) between
/// concurrent queries.
#[derive(Debug, Clone)]
pub struct Graph {
    pages: Vec<Page>,
    index_by_id: HashMap<PageId, DenseIndex>,
    index_by_title: HashMap<String, DenseIndex>,
    /// `targets[offsets[i]..offsets[i + 1]]` are the link targets of page `i`.
    offsets: Vec<usize>,
    targets: Vec<DenseIndex>,
}

impl Graph {
    /// Build a graph from page and link records.
    ///
    /// Pages keep their ingestion order; each page's outgoing links keep the
    /// order in which they were listed.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateIdentity`] if an id or title repeats and
    /// [`LoadError::UnknownReference`] if a link endpoint is not a page and
    /// [`LoadError::TooManyPages`] past `u32::MAX` pages.
    #[instrument(skip_all)]
    pub fn build<P, L>(pages: P, links: L) -> Result<Self, LoadError>
    where
        P: IntoIterator<Item = Page>,
        L: IntoIterator<Item = Link>,
    {
        let pages_iter = pages.into_iter();
        let mut stored: Vec<Page> = Vec::with_capacity(pages_iter.size_hint().0);
        let mut index_by_id: HashMap<PageId, DenseIndex> =
            HashMap::with_capacity(stored.capacity());
        let mut index_by_title: HashMap<String, DenseIndex> =
            HashMap::with_capacity(stored.capacity());

        for page in pages_iter {
            let idx = dense_index(stored.len())?;
            if index_by_id.insert(page.id, idx).is_some() {
                return Err(LoadError::DuplicateIdentity(Identity::Id(page.id)));
            }
            if index_by_title.insert(page.title.clone(), idx).is_some() {
                return Err(LoadError::DuplicateIdentity(Identity::Title(page.title)));
            }
            stored.push(page);
        }

        // Resolve endpoints first, then lay the pairs out by source with a
        // stable counting sort so per-source order is ingestion order.
        let mut resolved: Vec<(DenseIndex, DenseIndex)> = Vec::new();
        let mut out_degree = vec![0_usize; stored.len()];
        for link in links {
            let src = lookup_endpoint(&index_by_id, link, link.from)?;
            let dst = lookup_endpoint(&index_by_id, link, link.to)?;
            out_degree[src as usize] += 1;
            resolved.push((src, dst));
        }

        let mut offsets = Vec::with_capacity(stored.len() + 1);
        offsets.push(0);
        for degree in &out_degree {
            let last = offsets.last().copied().unwrap_or(0);
            offsets.push(last + degree);
        }

        let mut cursor: Vec<usize> = offsets[..stored.len()].to_vec();
        let mut targets: Vec<DenseIndex> = vec![0; resolved.len()];
        for (src, dst) in resolved {
            let slot = &mut cursor[src as usize];
            targets[*slot] = dst;
            *slot += 1;
        }

        info!(pages = stored.len(), links = targets.len(), "graph built");

        Ok(Self {
            pages: stored,
            index_by_id,
            index_by_title,
            offsets,
            targets,
        })
    }

    /// Title of page `id`.
    #[must_use]
    pub fn title_of(&self, id: PageId) -> Option<&str> {
        self.index_of(id).map(|idx| self.pages[idx].title.as_str())
    }

    /// Id of the page titled `title`.
    #[must_use]
    pub fn id_of(&self, title: &str) -> Option<PageId> {
        self.index_of_title(title).map(|idx| self.pages[idx].id)
    }

    /// Destinations of `id`'s outgoing links, in ingestion order.
    ///
    /// Returns `None` if `id` is not a page; a page without links yields an
    /// empty iterator.
    pub fn outgoing_links(&self, id: PageId) -> Option<impl ExactSizeIterator<Item = PageId> + '_> {
        self.index_of(id)
            .map(|idx| self.neighbors(idx).map(|t| self.pages[t].id))
    }

    /// Every page id, each exactly once.
    pub fn all_ids(&self) -> impl ExactSizeIterator<Item = PageId> + '_ {
        self.pages.iter().map(|p| p.id)
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of links, duplicates included.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of outgoing links of `id`.
    #[must_use]
    pub fn out_degree(&self, id: PageId) -> Option<usize> {
        self.index_of(id).map(|idx| self.neighbors(idx).len())
    }

    /// Whether `id` is a page.
    #[must_use]
    pub fn contains(&self, id: PageId) -> bool {
        self.index_by_id.contains_key(&id)
    }

    /// All pages in ingestion order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// All links, grouped by source in page order.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        (0..self.pages.len()).flat_map(move |src| {
            let from = self.pages[src].id;
            self.neighbors(src)
                .map(move |dst| Link::new(from, self.pages[dst].id))
        })
    }

    // -- dense-index access used by the query engines ----------------------

    pub(crate) fn index_of(&self, id: PageId) -> Option<usize> {
        self.index_by_id.get(&id).map(|&idx| idx as usize)
    }

    pub(crate) fn index_of_title(&self, title: &str) -> Option<usize> {
        self.index_by_title.get(title).map(|&idx| idx as usize)
    }

    pub(crate) fn page_at(&self, idx: usize) -> &Page {
        &self.pages[idx]
    }

    /// Dense indices of page `idx`'s link targets, in ingestion order.
    pub(crate) fn neighbors(&self, idx: usize) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.targets[self.offsets[idx]..self.offsets[idx + 1]]
            .iter()
            .map(|&t| t as usize)
    }
}

fn dense_index(position: usize) -> Result<DenseIndex, LoadError> {
    DenseIndex::try_from(position).map_err(|_| LoadError::TooManyPages {
        count: position.saturating_add(1),
    })
}

fn lookup_endpoint(
    index_by_id: &HashMap<PageId, DenseIndex>,
    link: Link,
    endpoint: PageId,
) -> Result<DenseIndex, LoadError> {
    index_by_id
        .get(&endpoint)
        .copied()
        .ok_or(LoadError::UnknownReference {
            from: link.from,
            to: link.to,
            missing: endpoint,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(items: &[(PageId, &str)]) -> Vec<Page> {
        items.iter().map(|(id, t)| Page::new(*id, *t)).collect()
    }

    fn links(items: &[(PageId, PageId)]) -> Vec<Link> {
        items.iter().map(|(a, b)| Link::new(*a, *b)).collect()
    }

    #[test]
    fn empty_graph() {
        let g = Graph::build(Vec::new(), Vec::new()).expect("build");
        assert_eq!(g.page_count(), 0);
        assert_eq!(g.link_count(), 0);
        assert_eq!(g.all_ids().count(), 0);
    }

    #[test]
    fn lookups_resolve_both_ways() {
        let g = Graph::build(pages(&[(1, "A"), (2, "B")]), links(&[(1, 2)])).expect("build");
        assert_eq!(g.title_of(1), Some("A"));
        assert_eq!(g.id_of("B"), Some(2));
        assert_eq!(g.title_of(9), None);
        assert_eq!(g.id_of("Z"), None);
        assert!(g.contains(2));
        assert!(!g.contains(3));
    }

    #[test]
    fn every_page_has_an_adjacency_entry() {
        let g = Graph::build(pages(&[(1, "A"), (2, "B"), (3, "C")]), links(&[(1, 2)]))
            .expect("build");
        for id in g.all_ids() {
            assert!(g.outgoing_links(id).is_some(), "page {id} has no entry");
        }
        assert_eq!(g.outgoing_links(3).expect("entry").len(), 0);
        assert!(g.outgoing_links(42).is_none());
    }

    #[test]
    fn outgoing_links_keep_ingestion_order_and_duplicates() {
        let g = Graph::build(
            pages(&[(1, "A"), (2, "B"), (3, "C")]),
            links(&[(2, 1), (1, 3), (2, 3), (1, 2), (1, 3)]),
        )
        .expect("build");

        let from_a: Vec<PageId> = g.outgoing_links(1).expect("entry").collect();
        assert_eq!(from_a, vec![3, 2, 3]);
        let from_b: Vec<PageId> = g.outgoing_links(2).expect("entry").collect();
        assert_eq!(from_b, vec![1, 3]);
        assert_eq!(g.link_count(), 5);
        assert_eq!(g.out_degree(1), Some(3));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = Graph::build(pages(&[(1, "A"), (1, "B")]), Vec::new()).unwrap_err();
        assert_eq!(err, LoadError::DuplicateIdentity(Identity::Id(1)));
        assert_eq!(err.code(), ErrorCode::DuplicateIdentity);
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let err = Graph::build(pages(&[(1, "A"), (2, "A")]), Vec::new()).unwrap_err();
        assert_eq!(
            err,
            LoadError::DuplicateIdentity(Identity::Title("A".to_string()))
        );
    }

    #[test]
    fn unknown_destination_is_rejected() {
        let err = Graph::build(pages(&[(1, "A")]), links(&[(1, 7)])).unwrap_err();
        assert_eq!(
            err,
            LoadError::UnknownReference {
                from: 1,
                to: 7,
                missing: 7
            }
        );
        assert_eq!(err.code(), ErrorCode::UnknownReference);
    }

    #[test]
    fn unknown_source_is_rejected() {
        let err = Graph::build(pages(&[(1, "A")]), links(&[(5, 1)])).unwrap_err();
        assert!(matches!(err, LoadError::UnknownReference { missing: 5, .. }));
    }

    #[test]
    fn links_iterates_every_edge() {
        let input = links(&[(1, 2), (2, 1), (1, 1)]);
        let g = Graph::build(pages(&[(1, "A"), (2, "B")]), input).expect("build");
        let mut all: Vec<(PageId, PageId)> = g.links().map(|l| (l.from, l.to)).collect();
        all.sort_unstable();
        assert_eq!(all, vec![(1, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn id_zero_is_an_ordinary_page() {
        let g = Graph::build(pages(&[(0, "Zero"), (1, "One")]), links(&[(0, 1)])).expect("build");
        assert_eq!(g.id_of("Zero"), Some(0));
        assert_eq!(g.title_of(0), Some("Zero"));
    }

    #[test]
    fn dense_index_stops_at_u32_max() {
        assert_eq!(dense_index(0), Ok(0));
        assert_eq!(dense_index(u32::MAX as usize), Ok(u32::MAX));

        #[cfg(target_pointer_width = "64")]
        {
            let past = u32::MAX as usize + 1;
            let err = dense_index(past).unwrap_err();
            assert_eq!(err, LoadError::TooManyPages { count: past + 1 });
            assert_eq!(err.code(), ErrorCode::GraphTooLarge);
        }
    }

    #[test]
    fn graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }
}
