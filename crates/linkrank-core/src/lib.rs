#![forbid(unsafe_code)]
//! linkrank-core library.
//!
//! Analytics over a static page/link graph: shortest hyperlink paths,
//! random-surfer importance ranking, longest titles and most-linked pages.
//!
//! # Conventions
//!
//! - **Errors**: each module defines a `thiserror` enum with a `code()`
//!   mapping to [`error::ErrorCode`]; file-oriented helpers return
//!   `anyhow::Result` with context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Sharing**: [`graph::Graph`] is immutable after construction and is
//!   shared by reference between queries.

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod path;
pub mod queries;
pub mod rank;

pub use error::ErrorCode;
pub use graph::{Graph, GraphStats, Link, LoadError, Page, PageId};
pub use path::{PathError, shortest_path, shortest_path_ids};
pub use queries::{LongestTitles, MostLinked, TitleFilter, longest_titles, most_linked};
pub use rank::{
    CancelToken, RankConfig, RankError, RankRun, RankVector, StopReason, compute_ranks, rank_run,
};
