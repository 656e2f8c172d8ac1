//! `linkrank analyze` — every query against one dataset.
//!
//! Runs longest title, most linked, a batch of sampled shortest paths and the
//! most popular page. The rank iteration is the slow part, so it runs on its
//! own scoped thread while the other queries share the same `&Graph`.

use std::io::{self, Write};
use std::thread;

use anyhow::anyhow;
use clap::Args;
use linkrank_core::{
    CancelToken, Graph, LongestTitles, RankConfig, TitleFilter, longest_titles, rank_run,
};
use serde::Serialize;
use tracing::info;

use super::linked::{self, MostLinkedReport};
use super::rank::{self as rank_cmd, RankOverrides, RankReport};
use super::sample::{self, SampleOverrides, SampledPath, sample_paths};
use super::{CommandContext, longest};
use crate::output::{CliError, pretty_kv, render_mode};
use crate::source::SourceArgs;

/// Arguments for `linkrank analyze`.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub rank: RankOverrides,

    #[command(flatten)]
    pub sample: SampleOverrides,
}

/// Report payload for `linkrank analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeReport<'g> {
    pub longest_title: LongestTitles<'g>,
    pub most_linked: MostLinkedReport<'g>,
    pub paths: Vec<SampledPath<'g>>,
    pub most_popular: RankReport<'g>,
    /// Set when the rank iteration stopped before converging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank_error: Option<CliError>,
}

fn write_text(report: &AnalyzeReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for page in &report.longest_title.pages {
        writeln!(w, "longest_title {}", page.title)?;
    }
    for page in &report.most_linked.pages {
        writeln!(w, "most_linked {} {}", page.title, report.most_linked.in_degree)?;
    }
    for sample in &report.paths {
        writeln!(w, "path {} -> {}: {}", sample.start, sample.goal, sample.outcome())?;
    }
    for page in &report.most_popular.most_popular {
        writeln!(w, "most_popular {}", page.title)?;
    }
    if let Some(err) = &report.rank_error {
        writeln!(w, "rank_error {}", err.message)?;
    }
    Ok(())
}

fn write_pretty(report: &AnalyzeReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    longest::write_pretty(&report.longest_title, w)?;
    linked::write_pretty(&report.most_linked, w)?;
    sample::write_pretty(&report.paths, w)?;
    rank_cmd::write_popular_pretty(&report.most_popular, w)?;
    if let Some(err) = &report.rank_error {
        pretty_kv(w, "Warning", &err.message)?;
    }
    writeln!(w)
}

/// Run every query; rank on a scoped worker thread, the rest on this one.
fn analyze<'g>(
    graph: &'g Graph,
    rank_config: &RankConfig,
    filter: &TitleFilter,
    count: usize,
    seed: Option<u64>,
) -> anyhow::Result<AnalyzeReport<'g>> {
    let cancel = CancelToken::new();
    let (ranked, longest_title, most_linked, paths) = thread::scope(|scope| {
        let ranker = scope.spawn(|| rank_run(graph, rank_config, &cancel));
        let longest_title = longest_titles(graph, filter);
        let most_linked = MostLinkedReport::from_graph(graph);
        let paths = sample_paths(graph, count, seed);
        (ranker.join(), longest_title, most_linked, paths)
    });
    let run = ranked.map_err(|_| anyhow!("rank worker panicked"))??;
    info!(iterations = run.iterations, stop = ?run.stop, "analysis complete");

    let most_popular = RankReport::from_run(graph, &run, 0);
    let rank_error = run
        .into_result()
        .err()
        .map(|err| CliError::with_code(err.to_string(), err.code()));

    Ok(AnalyzeReport {
        longest_title,
        most_linked,
        paths,
        most_popular,
        rank_error,
    })
}

/// Execute `linkrank analyze`.
///
/// Query failures (unreachable pairs, a non-converged rank run) are part of
/// the report; only load and configuration errors fail the command.
pub fn run_analyze(args: &AnalyzeArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let rank_config = args.rank.apply(&ctx.config.rank);
    let (count, seed) = args.sample.apply(&ctx.config.sample);
    let report = analyze(
        &graph,
        &rank_config,
        &ctx.config.titles.to_filter(),
        count,
        seed,
    )?;
    render_mode(ctx.output, &report, write_text, write_pretty)
}
