//! `linkrank stats` — structural summary of the loaded graph.

use std::io::{self, Write};

use clap::Args;
use linkrank_core::GraphStats;

use super::CommandContext;
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::source::SourceArgs;

/// Arguments for `linkrank stats`.
#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

fn rows(stats: &GraphStats) -> [(&'static str, String); 9] {
    [
        ("pages", stats.page_count.to_string()),
        ("links", stats.link_count.to_string()),
        ("dangling", stats.dangling_count.to_string()),
        ("self_links", stats.self_link_count.to_string()),
        ("max_in_degree", stats.max_in_degree.to_string()),
        ("max_out_degree", stats.max_out_degree.to_string()),
        ("density", format!("{:.6}", stats.density)),
        ("components", stats.scc_count.to_string()),
        ("largest_component", stats.largest_scc_size.to_string()),
    ]
}

fn write_text(stats: &GraphStats, w: &mut dyn Write) -> io::Result<()> {
    for (key, value) in rows(stats) {
        writeln!(w, "{key} {value}")?;
    }
    Ok(())
}

fn write_pretty(stats: &GraphStats, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Graph statistics")?;
    for (key, value) in rows(stats) {
        pretty_kv(w, &key.replace('_', " "), value)?;
    }
    writeln!(w)
}

/// Execute `linkrank stats`.
pub fn run_stats(args: &StatsArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let stats = GraphStats::from_graph(&graph);
    render_mode(ctx.output, &stats, write_text, write_pretty)
}
