//! Breadth-first shortest hyperlink path between two pages.
//!
//! # Algorithm
//!
//! BFS from the start page over outgoing links. Every page is enqueued at
//! most once; when it is first discovered the page that discovered it is
//! recorded as its parent. The search stops as soon as the goal is
//! discovered as the direct successor of a frontier page, and the path is
//! rebuilt once by following parent pointers back to the start.
//!
//! Because BFS finishes every depth-`k` page before any depth-`k + 1` page,
//! the returned path has the minimum number of links.
//!
//! Working memory (visited set, parent table, queue) is private to one call
//! and linear in the number of pages.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};

use crate::error::ErrorCode;
use crate::graph::{Graph, PageId};

/// Recoverable shortest-path failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A start or goal title does not name a page.
    #[error("page not found: {title}")]
    PageNotFound { title: String },

    /// A start or goal id does not name a page.
    #[error("unknown page id {0}")]
    UnknownPage(PageId),

    /// The goal is not reachable from the start.
    #[error("no path from {start} to {goal}")]
    PathNotFound { start: String, goal: String },
}

impl PathError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::PageNotFound { .. } | Self::UnknownPage(_) => ErrorCode::PageNotFound,
            Self::PathNotFound { .. } => ErrorCode::PathNotFound,
        }
    }
}

/// Shortest path from `start` to `goal`, as titles from start to goal
/// inclusive.
///
/// `start == goal` yields the one-element path `[start]`.
///
/// # Errors
///
/// [`PathError::PageNotFound`] if either title is unknown,
/// [`PathError::PathNotFound`] if the goal is unreachable.
#[instrument(skip(graph))]
pub fn shortest_path<'g>(
    graph: &'g Graph,
    start: &str,
    goal: &str,
) -> Result<Vec<&'g str>, PathError> {
    let start_idx = graph
        .index_of_title(start)
        .ok_or_else(|| PathError::PageNotFound {
            title: start.to_string(),
        })?;
    let goal_idx = graph
        .index_of_title(goal)
        .ok_or_else(|| PathError::PageNotFound {
            title: goal.to_string(),
        })?;

    let path = bfs(graph, start_idx, goal_idx).ok_or_else(|| PathError::PathNotFound {
        start: start.to_string(),
        goal: goal.to_string(),
    })?;

    Ok(path
        .into_iter()
        .map(|idx| graph.page_at(idx).title.as_str())
        .collect())
}

/// Shortest path between two page ids, as ids from start to goal inclusive.
///
/// # Errors
///
/// [`PathError::UnknownPage`] if either id is unknown,
/// [`PathError::PathNotFound`] if the goal is unreachable.
#[instrument(skip(graph))]
pub fn shortest_path_ids(
    graph: &Graph,
    start: PageId,
    goal: PageId,
) -> Result<Vec<PageId>, PathError> {
    let start_idx = graph.index_of(start).ok_or(PathError::UnknownPage(start))?;
    let goal_idx = graph.index_of(goal).ok_or(PathError::UnknownPage(goal))?;

    let path = bfs(graph, start_idx, goal_idx).ok_or_else(|| PathError::PathNotFound {
        start: graph.page_at(start_idx).title.clone(),
        goal: graph.page_at(goal_idx).title.clone(),
    })?;

    Ok(path.into_iter().map(|idx| graph.page_at(idx).id).collect())
}

/// BFS over dense indices. Returns the index path `start..=goal`.
fn bfs(graph: &Graph, start: usize, goal: usize) -> Option<Vec<usize>> {
    if start == goal {
        return Some(vec![start]);
    }

    let n = graph.page_count();
    let mut visited = FixedBitSet::with_capacity(n);
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut queue: VecDeque<usize> = VecDeque::from([start]);
    visited.insert(start);

    while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(current) {
            if visited.put(next) {
                continue;
            }
            parent[next] = Some(current);
            if next == goal {
                let path = reconstruct_path(&parent, start, goal);
                debug!(hops = path.len() - 1, "path found");
                return Some(path);
            }
            queue.push_back(next);
        }
    }

    debug!(explored = visited.count_ones(..), "frontier exhausted");
    None
}

fn reconstruct_path(parent: &[Option<usize>], start: usize, goal: usize) -> Vec<usize> {
    // Parent links run goal -> ... -> start; walk them and flip.
    let mut path = vec![goal];
    let mut cursor = goal;
    while cursor != start {
        match parent[cursor] {
            Some(prev) => {
                cursor = prev;
                path.push(prev);
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Page};

    fn build(nodes: &[(PageId, &str)], edges: &[(PageId, PageId)]) -> Graph {
        Graph::build(
            nodes.iter().map(|(id, t)| Page::new(*id, *t)),
            edges.iter().map(|(a, b)| Link::new(*a, *b)),
        )
        .expect("build")
    }

    fn abc() -> Graph {
        build(&[(1, "A"), (2, "B"), (3, "C")], &[(1, 2), (2, 3)])
    }

    #[test]
    fn follows_chain() {
        let g = abc();
        assert_eq!(shortest_path(&g, "A", "C").expect("path"), vec!["A", "B", "C"]);
    }

    #[test]
    fn links_are_directed() {
        let g = abc();
        let err = shortest_path(&g, "C", "A").unwrap_err();
        assert_eq!(
            err,
            PathError::PathNotFound {
                start: "C".to_string(),
                goal: "A".to_string()
            }
        );
        assert_eq!(err.code(), ErrorCode::PathNotFound);
    }

    #[test]
    fn start_equals_goal_is_single_page() {
        let g = abc();
        assert_eq!(shortest_path(&g, "B", "B").expect("path"), vec!["B"]);
    }

    #[test]
    fn start_equals_goal_without_links() {
        let g = build(&[(1, "Lonely")], &[]);
        assert_eq!(shortest_path(&g, "Lonely", "Lonely").expect("path"), vec!["Lonely"]);
    }

    #[test]
    fn unknown_titles_are_reported() {
        let g = abc();
        assert_eq!(
            shortest_path(&g, "Nope", "A").unwrap_err(),
            PathError::PageNotFound {
                title: "Nope".to_string()
            }
        );
        assert_eq!(
            shortest_path(&g, "A", "Gone").unwrap_err(),
            PathError::PageNotFound {
                title: "Gone".to_string()
            }
        );
    }

    #[test]
    fn prefers_fewer_hops_over_listing_order() {
        // A → B → C → D listed first, shortcut A → D listed last.
        let g = build(
            &[(1, "A"), (2, "B"), (3, "C"), (4, "D")],
            &[(1, 2), (2, 3), (3, 4), (1, 4)],
        );
        assert_eq!(shortest_path(&g, "A", "D").expect("path"), vec!["A", "D"]);
    }

    #[test]
    fn survives_cycles_and_self_links() {
        let g = build(
            &[(1, "A"), (2, "B"), (3, "C"), (4, "D")],
            &[(1, 1), (1, 2), (2, 1), (2, 3), (3, 2), (3, 4)],
        );
        assert_eq!(
            shortest_path(&g, "A", "D").expect("path"),
            vec!["A", "B", "C", "D"]
        );
    }

    #[test]
    fn diamond_returns_first_discovered_branch() {
        let g = build(
            &[(1, "A"), (2, "B"), (3, "C"), (4, "D")],
            &[(1, 2), (1, 3), (2, 4), (3, 4)],
        );
        assert_eq!(shortest_path(&g, "A", "D").expect("path"), vec!["A", "B", "D"]);
    }

    #[test]
    fn id_variant_matches_title_variant() {
        let g = abc();
        assert_eq!(shortest_path_ids(&g, 1, 3).expect("path"), vec![1, 2, 3]);
        assert_eq!(shortest_path_ids(&g, 2, 2).expect("path"), vec![2]);
        assert_eq!(shortest_path_ids(&g, 1, 99).unwrap_err(), PathError::UnknownPage(99));
        assert!(matches!(
            shortest_path_ids(&g, 3, 1),
            Err(PathError::PathNotFound { .. })
        ));
    }

    #[test]
    fn page_id_zero_is_searchable() {
        let g = build(&[(0, "Zero"), (1, "One")], &[(0, 1)]);
        assert_eq!(shortest_path(&g, "Zero", "One").expect("path"), vec!["Zero", "One"]);
    }
}
