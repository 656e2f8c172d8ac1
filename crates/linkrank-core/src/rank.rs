//! Random-surfer importance ranking (PageRank) over the page/link graph.
//!
//! # Algorithm
//!
//! Power iteration with damping `d`. Every page starts at 1.0 and each
//! iteration recomputes every score from the previous vector:
//!
//! ```text
//! PR'(p) = (1 - d) + d * Σ PR(j) / out_degree(j)   for each link j → p
//!                  + d * Σ PR(k) / N                for each dangling page k
//! ```
//!
//! A dangling page (no outgoing links) behaves as if it linked to every
//! page, so total mass stays at `N` instead of leaking away.
//!
//! Accumulation is driven by each page's outgoing-link list. The engine
//! holds two score vectors and an out-degree table, so memory is
//! O(pages + links).
//!
//! # Termination
//!
//! The loop stops when the largest per-page change falls below
//! [`RankConfig::tolerance`], when [`RankConfig::max_iterations`] is
//! reached, or when the caller cancels through a [`CancelToken`] or the
//! configured deadline passes. Every stop reason returns the latest score
//! vector; only convergence counts as success in [`compute_ranks`].

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::error::ErrorCode;
use crate::graph::{Graph, PageId};

/// Iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for rank computation.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Probability of following a link rather than jumping to a random page.
    /// Default: 0.85.
    pub damping: f64,
    /// Stop when the largest per-page change is below this value.
    /// Default: 1e-6.
    pub tolerance: f64,
    /// Hard cap on iterations.
    /// Default: [`DEFAULT_MAX_ITERATIONS`].
    pub max_iterations: usize,
    /// Optional wall-clock deadline, checked once per iteration.
    pub deadline: Option<Instant>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            deadline: None,
        }
    }
}

impl RankConfig {
    /// Reject settings the iteration cannot run with.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidConfig`] describing the first offending field.
    pub fn validate(&self) -> Result<(), RankError> {
        if !self.damping.is_finite() || !(0.0..=1.0).contains(&self.damping) {
            return Err(RankError::InvalidConfig(
                "damping must be finite and in [0, 1]".to_string(),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(RankError::InvalidConfig(
                "tolerance must be finite and > 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(RankError::InvalidConfig(
                "max_iterations must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared cancellation flag for a running rank computation.
///
/// Clones observe the same flag, so one clone can be handed to another
/// thread and cancelled from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The computation stops before its next iteration.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Page id → score mapping, kept in page ingestion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankVector {
    ids: Vec<PageId>,
    scores: Vec<f64>,
    index: HashMap<PageId, usize>,
}

impl RankVector {
    fn from_scores(graph: &Graph, scores: Vec<f64>) -> Self {
        let ids: Vec<PageId> = graph.all_ids().collect();
        let index = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        Self { ids, scores, index }
    }

    /// Score of page `id`.
    #[must_use]
    pub fn get(&self, id: PageId) -> Option<f64> {
        self.index.get(&id).map(|&i| self.scores[i])
    }

    /// `(id, score)` pairs in page ingestion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PageId, f64)> + '_ {
        self.ids.iter().copied().zip(self.scores.iter().copied())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sum of all scores.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Highest score and every page that reaches it exactly.
    ///
    /// Returns `None` for an empty vector.
    #[must_use]
    pub fn top(&self) -> Option<(f64, Vec<PageId>)> {
        let max = self.scores.iter().copied().fold(None, |acc: Option<f64>, s| {
            Some(acc.map_or(s, |m| m.max(s)))
        })?;
        #[allow(clippy::float_cmp)]
        let ids = self.iter().filter(|(_, s)| *s == max).map(|(id, _)| id).collect();
        Some((max, ids))
    }

    /// The `k` highest-scoring pages, score descending; equal scores keep
    /// ingestion order.
    #[must_use]
    pub fn top_k(&self, k: usize) -> Vec<(PageId, f64)> {
        let mut ranked: Vec<(PageId, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }

    /// Copy into a plain map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<PageId, f64> {
        self.iter().collect()
    }
}

/// Why the iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Largest per-page change fell below the tolerance.
    Converged,
    /// `max_iterations` reached first.
    IterationCap,
    /// Cancelled by token or deadline.
    Cancelled,
}

/// Outcome of one rank computation, whatever the stop reason.
#[derive(Debug, Clone)]
pub struct RankRun {
    /// Scores after the last completed iteration.
    pub ranks: RankVector,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Largest per-page change in the last iteration.
    pub max_delta: f64,
    pub stop: StopReason,
}

impl RankRun {
    #[must_use]
    pub fn converged(&self) -> bool {
        self.stop == StopReason::Converged
    }

    /// Turn a non-converged run into the matching [`RankError`].
    ///
    /// # Errors
    ///
    /// [`RankError::NonConvergence`] or [`RankError::Cancelled`], both
    /// carrying the best available vector.
    pub fn into_result(self) -> Result<RankVector, RankError> {
        match self.stop {
            StopReason::Converged => Ok(self.ranks),
            StopReason::IterationCap => Err(RankError::NonConvergence {
                iterations: self.iterations,
                max_delta: self.max_delta,
                best: self.ranks,
            }),
            StopReason::Cancelled => Err(RankError::Cancelled {
                iterations: self.iterations,
                best: self.ranks,
            }),
        }
    }
}

/// Rank computation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RankError {
    #[error("invalid rank configuration: {0}")]
    InvalidConfig(String),

    /// The cap was reached before the tolerance was met.
    #[error("ranks did not converge after {iterations} iterations (max delta {max_delta:e})")]
    NonConvergence {
        iterations: usize,
        max_delta: f64,
        best: RankVector,
    },

    #[error("rank computation cancelled after {iterations} iterations")]
    Cancelled { iterations: usize, best: RankVector },
}

impl RankError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::NonConvergence { .. } => ErrorCode::RankNonConvergence,
            Self::Cancelled { .. } => ErrorCode::RankCancelled,
        }
    }

    /// The best vector computed before the failure, if any work was done.
    #[must_use]
    pub fn best(&self) -> Option<&RankVector> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::NonConvergence { best, .. } | Self::Cancelled { best, .. } => Some(best),
        }
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute ranks and require convergence.
///
/// # Errors
///
/// [`RankError::InvalidConfig`] for a bad config, and
/// [`RankError::NonConvergence`] / [`RankError::Cancelled`] (with the best
/// available vector) when the run does not converge.
pub fn compute_ranks(graph: &Graph, config: &RankConfig) -> Result<RankVector, RankError> {
    rank_run(graph, config, &CancelToken::new())?.into_result()
}

/// Run the power iteration and report how it stopped.
///
/// # Errors
///
/// Only [`RankError::InvalidConfig`]; non-convergence and cancellation are
/// reported through [`RankRun::stop`].
#[instrument(skip(graph, config, cancel))]
#[allow(clippy::cast_precision_loss)]
pub fn rank_run(
    graph: &Graph,
    config: &RankConfig,
    cancel: &CancelToken,
) -> Result<RankRun, RankError> {
    config.validate()?;

    let n = graph.page_count();
    if n == 0 {
        return Ok(RankRun {
            ranks: RankVector::default(),
            iterations: 0,
            max_delta: 0.0,
            stop: StopReason::Converged,
        });
    }

    let n_f64 = n as f64;
    let damping = config.damping;
    let base = 1.0 - damping;
    let out_degree: Vec<usize> = (0..n).map(|idx| graph.neighbors(idx).len()).collect();

    let mut scores = vec![1.0_f64; n];
    let mut next = vec![0.0_f64; n];
    let mut iterations = 0;
    let mut max_delta = f64::INFINITY;
    let mut stop = StopReason::IterationCap;

    while iterations < config.max_iterations {
        if cancel.is_cancelled() || config.deadline.is_some_and(|d| Instant::now() >= d) {
            stop = StopReason::Cancelled;
            break;
        }
        iterations += 1;

        let dangling: f64 = scores
            .iter()
            .zip(&out_degree)
            .filter(|&(_, &deg)| deg == 0)
            .map(|(score, _)| score)
            .sum();
        next.fill(damping.mul_add(dangling / n_f64, base));

        for (idx, &deg) in out_degree.iter().enumerate() {
            if deg == 0 {
                continue;
            }
            let share = damping * scores[idx] / deg as f64;
            for target in graph.neighbors(idx) {
                next[target] += share;
            }
        }

        max_delta = scores
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .fold(0.0, f64::max);

        std::mem::swap(&mut scores, &mut next);
        debug!(iteration = iterations, max_delta, "rank iteration");

        if max_delta < config.tolerance {
            stop = StopReason::Converged;
            break;
        }
    }

    match stop {
        StopReason::Converged => info!(iterations, max_delta, "ranks converged"),
        StopReason::IterationCap => warn!(iterations, max_delta, "rank iteration cap reached"),
        StopReason::Cancelled => warn!(iterations, "rank computation cancelled"),
    }

    Ok(RankRun {
        ranks: RankVector::from_scores(graph, scores),
        iterations,
        max_delta,
        stop,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, Page};

    fn build(nodes: &[PageId], edges: &[(PageId, PageId)]) -> Graph {
        Graph::build(
            nodes.iter().map(|id| Page::new(*id, format!("P{id}"))),
            edges.iter().map(|(a, b)| Link::new(*a, *b)),
        )
        .expect("build")
    }

    #[test]
    fn empty_graph_converges_immediately() {
        let run = rank_run(&build(&[], &[]), &RankConfig::default(), &CancelToken::new())
            .expect("run");
        assert!(run.converged());
        assert_eq!(run.iterations, 0);
        assert!(run.ranks.is_empty());
        assert!(run.ranks.top().is_none());
    }

    #[test]
    fn single_dangling_page_is_exactly_one() {
        let run = rank_run(&build(&[1], &[]), &RankConfig::default(), &CancelToken::new())
            .expect("run");
        assert!(run.converged());
        assert_eq!(run.iterations, 1);
        let score = run.ranks.get(1).expect("score");
        assert!((score - 1.0).abs() < 1e-12, "score={score}");
    }

    #[test]
    fn link_target_outranks_source() {
        let ranks = compute_ranks(&build(&[1, 2], &[(1, 2)]), &RankConfig::default())
            .expect("converge");
        let a = ranks.get(1).expect("a");
        let b = ranks.get(2).expect("b");
        assert!(b > a, "b={b} a={a}");
        assert_eq!(ranks.top().expect("top").1, vec![2]);
    }

    #[test]
    fn dangling_mass_is_conserved() {
        let ranks = compute_ranks(&build(&[1, 2], &[(1, 2)]), &RankConfig::default())
            .expect("converge");
        assert!((ranks.total() - 2.0).abs() < 1e-5, "total={}", ranks.total());
    }

    #[test]
    fn duplicate_links_carry_extra_mass() {
        // 1 links to 2 twice and to 3 once: 2 receives two thirds of 1's share.
        let ranks = compute_ranks(
            &build(&[1, 2, 3], &[(1, 2), (1, 2), (1, 3)]),
            &RankConfig::default(),
        )
        .expect("converge");
        assert!(ranks.get(2).expect("2") > ranks.get(3).expect("3"));
    }

    #[test]
    fn iteration_cap_reports_non_convergence_with_best_vector() {
        let config = RankConfig {
            max_iterations: 1,
            tolerance: 1e-15,
            ..RankConfig::default()
        };
        let err = compute_ranks(&build(&[1, 2, 3], &[(1, 2), (2, 3)]), &config).unwrap_err();
        assert_eq!(err.code(), ErrorCode::RankNonConvergence);
        match err {
            RankError::NonConvergence {
                iterations, best, ..
            } => {
                assert_eq!(iterations, 1);
                assert_eq!(best.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cancelled_token_stops_before_first_iteration() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let run = rank_run(&build(&[1, 2], &[(1, 2)]), &RankConfig::default(), &cancel)
            .expect("run");
        assert_eq!(run.stop, StopReason::Cancelled);
        assert_eq!(run.iterations, 0);
        assert_eq!(run.ranks.get(1), Some(1.0));
        assert!(matches!(
            run.into_result(),
            Err(RankError::Cancelled { iterations: 0, .. })
        ));
    }

    #[test]
    fn past_deadline_cancels() {
        let config = RankConfig {
            deadline: Some(Instant::now()),
            ..RankConfig::default()
        };
        let run = rank_run(&build(&[1, 2], &[(1, 2)]), &config, &CancelToken::new())
            .expect("run");
        assert_eq!(run.stop, StopReason::Cancelled);
        assert_eq!(run.iterations, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let g = build(&[1], &[]);
        for config in [
            RankConfig {
                damping: 1.5,
                ..RankConfig::default()
            },
            RankConfig {
                damping: f64::NAN,
                ..RankConfig::default()
            },
            RankConfig {
                tolerance: 0.0,
                ..RankConfig::default()
            },
            RankConfig {
                max_iterations: 0,
                ..RankConfig::default()
            },
        ] {
            let err = compute_ranks(&g, &config).unwrap_err();
            assert!(matches!(err, RankError::InvalidConfig(_)), "{config:?}");
            assert!(err.best().is_none());
        }
    }

    #[test]
    fn top_reports_all_ties() {
        // Two disjoint symmetric pairs: every page ends with the same score.
        let ranks = compute_ranks(
            &build(&[1, 2, 3, 4], &[(1, 2), (2, 1), (3, 4), (4, 3)]),
            &RankConfig::default(),
        )
        .expect("converge");
        let (_, ids) = ranks.top().expect("top");
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn top_k_orders_by_score() {
        let ranks = compute_ranks(
            &build(&[1, 2, 3], &[(1, 3), (2, 3), (3, 1)]),
            &RankConfig::default(),
        )
        .expect("converge");
        let top = ranks.top_k(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, 3);
        assert_eq!(top[1].0, 1);
        assert!(ranks.top_k(10).len() == 3);
    }
}
