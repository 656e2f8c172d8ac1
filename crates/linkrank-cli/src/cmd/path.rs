//! `linkrank path` — shortest hyperlink path between two titles.

use std::io::{self, Write};

use clap::Args;
use linkrank_core::shortest_path;
use serde::Serialize;

use super::CommandContext;
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::source::SourceArgs;

/// Arguments for `linkrank path`.
#[derive(Args, Debug)]
pub struct PathArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Title to start from.
    pub start: String,

    /// Title to reach.
    pub goal: String,
}

/// Report payload for `linkrank path`.
#[derive(Debug, Serialize)]
pub struct PathReport<'g> {
    pub start: String,
    pub goal: String,
    pub hops: usize,
    pub path: Vec<&'g str>,
}

impl<'g> PathReport<'g> {
    pub fn new(start: &str, goal: &str, path: Vec<&'g str>) -> Self {
        Self {
            start: start.to_string(),
            goal: goal.to_string(),
            hops: path.len().saturating_sub(1),
            path,
        }
    }
}

pub fn write_text(report: &PathReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", report.path.join(" -> "))
}

pub fn write_pretty(report: &PathReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(
        w,
        &format!("Shortest path from {} to {}", report.start, report.goal),
    )?;
    pretty_kv(w, "Path", report.path.join(" -> "))?;
    pretty_kv(w, "Hops", report.hops.to_string())?;
    writeln!(w)
}

/// Execute `linkrank path`.
pub fn run_path(args: &PathArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let path = shortest_path(&graph, &args.start, &args.goal)?;
    let report = PathReport::new(&args.start, &args.goal, path);
    render_mode(ctx.output, &report, write_text, write_pretty)
}
