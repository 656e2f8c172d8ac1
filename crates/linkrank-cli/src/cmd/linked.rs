//! `linkrank most-linked` — pages with the highest in-degree.

use std::io::{self, Write};

use clap::Args;
use linkrank_core::{Graph, most_linked};
use serde::Serialize;

use super::{CommandContext, PageRef, join_titles, page_refs};
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::source::SourceArgs;

/// Arguments for `linkrank most-linked`.
#[derive(Args, Debug, Default)]
pub struct MostLinkedArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Report payload for `linkrank most-linked`.
#[derive(Debug, Serialize)]
pub struct MostLinkedReport<'g> {
    pub in_degree: usize,
    pub pages: Vec<PageRef<'g>>,
}

impl<'g> MostLinkedReport<'g> {
    pub fn from_graph(graph: &'g Graph) -> Self {
        let result = most_linked(graph);
        Self {
            in_degree: result.in_degree,
            pages: page_refs(graph, &result.pages),
        }
    }
}

pub fn write_text(report: &MostLinkedReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    for page in &report.pages {
        writeln!(w, "{} {}", page.title, report.in_degree)?;
    }
    Ok(())
}

pub fn write_pretty(report: &MostLinkedReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Most linked page")?;
    pretty_kv(w, "Title", join_titles(report.pages.iter().map(|p| p.title)))?;
    pretty_kv(w, "Incoming", report.in_degree.to_string())?;
    writeln!(w)
}

/// Execute `linkrank most-linked`.
pub fn run_most_linked(args: &MostLinkedArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let report = MostLinkedReport::from_graph(&graph);
    render_mode(ctx.output, &report, write_text, write_pretty)
}
