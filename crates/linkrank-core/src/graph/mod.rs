//! Page/link graph module.
//!
//! # Overview
//!
//! [`store::Graph`] is the single shared data structure of the engine. It is
//! built once from ingested records and never mutated afterwards; every
//! query ([`crate::path`], [`crate::rank`], [`crate::queries`]) reads it
//! through a shared reference.
//!
//! ## Pipeline
//!
//! ```text
//! pages_*.txt / links_*.txt
//!        ↓  ingest::read_pages() / ingest::read_links()
//! Vec<Page>, Vec<Link>
//!        ↓  store::Graph::build()
//! Graph (CSR adjacency, id/title indexes)
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (counts, density, components)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use linkrank_core::graph::{Graph, Link, Page, stats::GraphStats};
//!
//! let graph = Graph::build(
//!     vec![Page::new(1, "A"), Page::new(2, "B")],
//!     vec![Link::new(1, 2)],
//! )?;
//! let stats = GraphStats::from_graph(&graph);
//! assert_eq!(stats.link_count, 1);
//! # Ok::<(), linkrank_core::graph::LoadError>(())
//! ```

pub mod stats;
pub mod store;

pub use stats::GraphStats;
pub use store::{Graph, Identity, Link, LoadError, Page, PageId};
