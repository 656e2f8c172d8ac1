//! Descriptive queries: longest title and most-linked pages.
//!
//! Both are single linear scans over the graph. Ties are always reported in
//! full, in page ingestion order.

use serde::Serialize;

use crate::graph::{Graph, Page, PageId};

// ---------------------------------------------------------------------------
// Longest title
// ---------------------------------------------------------------------------

/// Which titles take part in the longest-title comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleFilter {
    /// Titles containing this character are skipped. `None` keeps every
    /// title. Default: `Some('_')`, the word separator used in article slugs.
    pub excluded_separator: Option<char>,
}

impl Default for TitleFilter {
    fn default() -> Self {
        Self {
            excluded_separator: Some('_'),
        }
    }
}

impl TitleFilter {
    /// A filter that keeps every title.
    #[must_use]
    pub const fn keep_all() -> Self {
        Self {
            excluded_separator: None,
        }
    }

    #[must_use]
    pub fn accepts(&self, title: &str) -> bool {
        self.excluded_separator.is_none_or(|sep| !title.contains(sep))
    }
}

/// Longest qualifying titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestTitles<'g> {
    /// Length in characters; zero when nothing qualified.
    pub length: usize,
    pub pages: Vec<&'g Page>,
}

/// Every page whose title is the longest (by character count) among the
/// titles accepted by `filter`.
#[must_use]
pub fn longest_titles<'g>(graph: &'g Graph, filter: &TitleFilter) -> LongestTitles<'g> {
    let mut length = 0;
    let mut pages: Vec<&Page> = Vec::new();

    for page in graph.pages() {
        if !filter.accepts(&page.title) {
            continue;
        }
        let len = page.title.chars().count();
        if len > length || pages.is_empty() {
            length = len;
            pages.clear();
            pages.push(page);
        } else if len == length {
            pages.push(page);
        }
    }

    LongestTitles { length, pages }
}

// ---------------------------------------------------------------------------
// Most linked
// ---------------------------------------------------------------------------

/// Pages with the highest in-degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MostLinked {
    pub in_degree: usize,
    pub pages: Vec<PageId>,
}

/// In-degree of every page, in ingestion order. Duplicate links count.
#[must_use]
pub fn in_degrees(graph: &Graph) -> Vec<(PageId, usize)> {
    let counts = in_degree_table(graph);
    graph.all_ids().zip(counts).collect()
}

/// Every page whose in-degree equals the maximum in-degree.
///
/// On a graph with pages but no links every page ties at zero.
#[must_use]
pub fn most_linked(graph: &Graph) -> MostLinked {
    let counts = in_degree_table(graph);
    let in_degree = counts.iter().copied().max().unwrap_or(0);
    let pages = graph
        .all_ids()
        .zip(&counts)
        .filter(|&(_, &count)| count == in_degree)
        .map(|(id, _)| id)
        .collect();
    MostLinked { in_degree, pages }
}

fn in_degree_table(graph: &Graph) -> Vec<usize> {
    let mut counts = vec![0_usize; graph.page_count()];
    for idx in 0..graph.page_count() {
        for target in graph.neighbors(idx) {
            counts[target] += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Link;

    fn titled(titles: &[&str]) -> Graph {
        Graph::build(
            titles
                .iter()
                .zip(1_u64..)
                .map(|(t, id)| Page::new(id, *t)),
            Vec::new(),
        )
        .expect("build")
    }

    fn linked(nodes: &[PageId], edges: &[(PageId, PageId)]) -> Graph {
        Graph::build(
            nodes.iter().map(|id| Page::new(*id, format!("P{id}"))),
            edges.iter().map(|(a, b)| Link::new(*a, *b)),
        )
        .expect("build")
    }

    fn titles<'g>(result: &LongestTitles<'g>) -> Vec<&'g str> {
        result.pages.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn separator_titles_are_skipped() {
        let g = titled(&["Cat", "Elephant", "New_York"]);
        let result = longest_titles(&g, &TitleFilter::default());
        assert_eq!(titles(&result), vec!["Elephant"]);
        assert_eq!(result.length, 8);
    }

    #[test]
    fn keep_all_counts_separator_titles() {
        let g = titled(&["Cat", "Elephant", "New_York_City"]);
        let result = longest_titles(&g, &TitleFilter::keep_all());
        assert_eq!(titles(&result), vec!["New_York_City"]);
    }

    #[test]
    fn custom_separator() {
        let g = titled(&["Long-Hyphenated", "Under_score_title"]);
        let filter = TitleFilter {
            excluded_separator: Some('-'),
        };
        assert_eq!(titles(&longest_titles(&g, &filter)), vec!["Under_score_title"]);
    }

    #[test]
    fn ties_are_all_reported_in_order() {
        let g = titled(&["Dog", "Zebra", "A_very_long", "Horse", "Cat"]);
        let result = longest_titles(&g, &TitleFilter::default());
        assert_eq!(titles(&result), vec!["Zebra", "Horse"]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let g = titled(&["Ünïcödé", "Plainer"]);
        let result = longest_titles(&g, &TitleFilter::default());
        assert_eq!(result.length, 7);
        assert_eq!(titles(&result), vec!["Ünïcödé", "Plainer"]);
    }

    #[test]
    fn nothing_qualifies() {
        let g = titled(&["A_B", "C_D"]);
        let result = longest_titles(&g, &TitleFilter::default());
        assert!(result.pages.is_empty());
        assert_eq!(result.length, 0);
    }

    #[test]
    fn most_linked_picks_highest_in_degree() {
        let g = linked(&[1, 2, 3], &[(1, 2), (3, 2), (1, 3)]);
        let result = most_linked(&g);
        assert_eq!(result.in_degree, 2);
        assert_eq!(result.pages, vec![2]);
        assert_eq!(in_degrees(&g), vec![(1, 0), (2, 2), (3, 1)]);
    }

    #[test]
    fn most_linked_reports_ties_and_counts_duplicates() {
        let g = linked(&[1, 2, 3], &[(1, 2), (1, 2), (2, 3), (1, 3)]);
        let result = most_linked(&g);
        assert_eq!(result.in_degree, 2);
        assert_eq!(result.pages, vec![2, 3]);
    }

    #[test]
    fn most_linked_without_links_is_every_page() {
        let g = linked(&[4, 5], &[]);
        assert_eq!(
            most_linked(&g),
            MostLinked {
                in_degree: 0,
                pages: vec![4, 5]
            }
        );
    }

    #[test]
    fn most_linked_on_empty_graph() {
        let g = linked(&[], &[]);
        let result = most_linked(&g);
        assert!(result.pages.is_empty());
    }
}
