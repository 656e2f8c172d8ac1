pub mod analyze;
pub mod linked;
pub mod longest;
pub mod path;
pub mod rank;
pub mod sample;
pub mod stats;

use std::path::Path;

use linkrank_core::config::LinkrankConfig;
use linkrank_core::{Graph, PageId};
use serde::Serialize;

use crate::output::OutputMode;

/// Shared state every command handler receives.
#[derive(Debug)]
pub struct CommandContext<'a> {
    pub output: OutputMode,
    pub config: &'a LinkrankConfig,
    pub cwd: &'a Path,
}

/// A page as it appears in command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRef<'g> {
    pub id: PageId,
    pub title: &'g str,
}

/// Look up titles for `ids`, skipping ids the graph does not know.
pub fn page_refs<'g>(graph: &'g Graph, ids: &[PageId]) -> Vec<PageRef<'g>> {
    ids.iter()
        .filter_map(|&id| graph.title_of(id).map(|title| PageRef { id, title }))
        .collect()
}

/// `A, B, C`, or `(none)` for an empty list.
pub fn join_titles<'a>(titles: impl IntoIterator<Item = &'a str>) -> String {
    let joined = titles.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkrank_core::Page;

    #[test]
    fn page_refs_resolve_titles_in_order() {
        let graph = Graph::build(
            vec![Page::new(0, "Zero"), Page::new(7, "Seven")],
            Vec::new(),
        )
        .expect("graph");
        let refs = page_refs(&graph, &[7, 0, 99]);
        assert_eq!(
            refs,
            vec![
                PageRef {
                    id: 7,
                    title: "Seven"
                },
                PageRef { id: 0, title: "Zero" },
            ]
        );
    }

    #[test]
    fn join_titles_marks_empty() {
        assert_eq!(join_titles(["A", "B"]), "A, B");
        assert_eq!(join_titles(std::iter::empty()), "(none)");
    }
}
