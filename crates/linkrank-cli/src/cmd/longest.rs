//! `linkrank longest-title` — longest page title(s).

use std::io::{self, Write};

use clap::Args;
use linkrank_core::config::LinkrankConfig;
use linkrank_core::{LongestTitles, TitleFilter, longest_titles};

use super::{CommandContext, join_titles};
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::source::SourceArgs;

/// Arguments for `linkrank longest-title`.
#[derive(Args, Debug, Default)]
pub struct LongestTitleArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Skip titles containing this character (defaults to `[titles] separator`).
    #[arg(long, conflicts_with = "no_separator")]
    pub separator: Option<char>,

    /// Consider every title, including ones with a separator.
    #[arg(long)]
    pub no_separator: bool,
}

impl LongestTitleArgs {
    /// Flags first, then `[titles]` config.
    pub fn filter(&self, config: &LinkrankConfig) -> TitleFilter {
        if self.no_separator {
            TitleFilter::keep_all()
        } else if let Some(sep) = self.separator {
            TitleFilter {
                excluded_separator: Some(sep),
            }
        } else {
            config.titles.to_filter()
        }
    }
}

pub fn write_text(result: &LongestTitles<'_>, w: &mut dyn Write) -> io::Result<()> {
    for page in &result.pages {
        writeln!(w, "{}", page.title)?;
    }
    Ok(())
}

pub fn write_pretty(result: &LongestTitles<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Longest title")?;
    pretty_kv(
        w,
        "Title",
        join_titles(result.pages.iter().map(|p| p.title.as_str())),
    )?;
    pretty_kv(w, "Length", result.length.to_string())?;
    writeln!(w)
}

/// Execute `linkrank longest-title`.
pub fn run_longest_title(args: &LongestTitleArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let result = longest_titles(&graph, &args.filter(ctx.config));
    render_mode(ctx.output, &result, write_text, write_pretty)
}
