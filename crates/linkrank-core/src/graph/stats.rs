//! Summary statistics for a page/link graph.
//!
//! # Statistics Provided
//!
//! - **page_count** / **link_count**: sizes of the graph (links counted with
//!   multiplicity).
//! - **dangling_count**: pages with no outgoing links. These are the pages
//!   whose rank mass is spread over the whole graph.
//! - **self_link_count**: links whose source and destination coincide.
//! - **max_in_degree** / **max_out_degree**: highest degrees observed.
//! - **density**: `link_count / (page_count * (page_count - 1))`, zero for
//!   graphs with fewer than two pages. Can exceed 1.0 when duplicate links
//!   are present.
//! - **scc_count** / **largest_scc_size**: strongly connected components.
//!   A shortest path between two pages in the same component always exists.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::instrument;

use super::store::Graph;

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub page_count: usize,
    pub link_count: usize,
    pub dangling_count: usize,
    pub self_link_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub density: f64,
    pub scc_count: usize,
    pub largest_scc_size: usize,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    #[instrument(skip(graph))]
    pub fn from_graph(graph: &Graph) -> Self {
        let n = graph.page_count();
        let mut in_degree = vec![0_usize; n];
        let mut dangling_count = 0;
        let mut self_link_count = 0;
        let mut max_out_degree = 0;

        for idx in 0..n {
            let targets = graph.neighbors(idx);
            let out_degree = targets.len();
            if out_degree == 0 {
                dangling_count += 1;
            }
            max_out_degree = max_out_degree.max(out_degree);
            for t in targets {
                in_degree[t] += 1;
                if t == idx {
                    self_link_count += 1;
                }
            }
        }

        let components = tarjan_scc(&to_petgraph(graph));
        let largest_scc_size = components.iter().map(Vec::len).max().unwrap_or(0);

        Self {
            page_count: n,
            link_count: graph.link_count(),
            dangling_count,
            self_link_count,
            max_in_degree: in_degree.iter().copied().max().unwrap_or(0),
            max_out_degree,
            density: density(n, graph.link_count()),
            scc_count: components.len(),
            largest_scc_size,
        }
    }
}

/// Links per ordered page pair, in `f64` so large page counts cannot overflow.
#[allow(clippy::cast_precision_loss)]
fn density(page_count: usize, link_count: usize) -> f64 {
    if page_count < 2 {
        return 0.0;
    }
    let n = page_count as f64;
    link_count as f64 / (n * (n - 1.0))
}

/// Mirror the graph's topology into a petgraph `DiGraph` indexed by dense
/// page index.
fn to_petgraph(graph: &Graph) -> DiGraph<(), ()> {
    let n = graph.page_count();
    let mut pg = DiGraph::<(), ()>::with_capacity(n, graph.link_count());
    for _ in 0..n {
        pg.add_node(());
    }
    for src in 0..n {
        for dst in graph.neighbors(src) {
            pg.add_edge(NodeIndex::new(src), NodeIndex::new(dst), ());
        }
    }
    pg
}
