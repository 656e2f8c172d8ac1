//! `linkrank rank` — random-surfer importance scores.

use std::io::{self, Write};

use clap::Args;
use linkrank_core::config::RankSection;
use linkrank_core::{CancelToken, Graph, PageId, RankConfig, RankRun, StopReason, rank_run};
use serde::Serialize;

use super::{CommandContext, PageRef, join_titles, page_refs};
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::source::SourceArgs;

/// Iteration knobs; each one overrides the matching `[rank]` config value.
#[derive(Args, Debug, Clone, Default)]
pub struct RankOverrides {
    /// Probability of following a link instead of teleporting.
    #[arg(long)]
    pub damping: Option<f64>,

    /// Stop once no score moves by this much or more.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Give up after this many iterations.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Wall-clock limit for the whole computation.
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl RankOverrides {
    pub fn apply(&self, section: &RankSection) -> RankConfig {
        let mut section = section.clone();
        if let Some(damping) = self.damping {
            section.damping = damping;
        }
        if let Some(tolerance) = self.tolerance {
            section.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            section.max_iterations = max_iterations;
        }
        if self.timeout_secs.is_some() {
            section.timeout_secs = self.timeout_secs;
        }
        section.to_rank_config()
    }
}

/// Arguments for `linkrank rank`.
#[derive(Args, Debug, Default)]
pub struct RankArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub rank: RankOverrides,

    /// Number of highest-scoring pages to list.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Serialize)]
pub struct ScoredPage<'g> {
    pub id: PageId,
    pub title: &'g str,
    pub score: f64,
}

/// Report payload for `linkrank rank`.
#[derive(Debug, Serialize)]
pub struct RankReport<'g> {
    pub stop: StopReason,
    pub iterations: usize,
    pub max_delta: f64,
    /// Highest score, shared by every page in `most_popular`.
    pub top_score: Option<f64>,
    pub most_popular: Vec<PageRef<'g>>,
    pub top: Vec<ScoredPage<'g>>,
}

impl<'g> RankReport<'g> {
    pub fn from_run(graph: &'g Graph, run: &RankRun, top: usize) -> Self {
        let (top_score, popular) = run
            .ranks
            .top()
            .map_or((None, Vec::new()), |(score, ids)| (Some(score), ids));
        let top = run
            .ranks
            .top_k(top)
            .into_iter()
            .filter_map(|(id, score)| {
                graph
                    .title_of(id)
                    .map(|title| ScoredPage { id, title, score })
            })
            .collect();
        Self {
            stop: run.stop,
            iterations: run.iterations,
            max_delta: run.max_delta,
            top_score,
            most_popular: page_refs(graph, &popular),
            top,
        }
    }

    fn stop_label(&self) -> String {
        match self.stop {
            StopReason::Converged => format!("converged after {} iterations", self.iterations),
            StopReason::IterationCap => format!(
                "not converged after {} iterations (max delta {:e})",
                self.iterations, self.max_delta
            ),
            StopReason::Cancelled => format!("cancelled after {} iterations", self.iterations),
        }
    }
}

pub fn write_text(report: &RankReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for page in &report.top {
        writeln!(w, "{:.6} {}", page.score, page.title)?;
    }
    Ok(())
}

pub fn write_popular_pretty(report: &RankReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Most popular page")?;
    pretty_kv(
        w,
        "Title",
        join_titles(report.most_popular.iter().map(|p| p.title)),
    )?;
    if let Some(score) = report.top_score {
        pretty_kv(w, "Score", format!("{score:.6}"))?;
    }
    pretty_kv(w, "Status", report.stop_label())
}

pub fn write_pretty(report: &RankReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    write_popular_pretty(report, w)?;
    writeln!(w)?;
    pretty_section(w, &format!("Top {} pages", report.top.len()))?;
    for (i, page) in report.top.iter().enumerate() {
        writeln!(w, "{:>4}. {:<40} {:.6}", i + 1, page.title, page.score)?;
    }
    writeln!(w)
}

/// Execute `linkrank rank`.
///
/// The best available scores are printed even when the run stops early;
/// the command then fails with the non-convergence or cancellation error.
pub fn run_rank(args: &RankArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let config = args.rank.apply(&ctx.config.rank);
    let run = rank_run(&graph, &config, &CancelToken::new())?;

    let report = RankReport::from_run(&graph, &run, args.top);
    render_mode(ctx.output, &report, write_text, write_pretty)?;
    run.into_result()?;
    Ok(())
}
