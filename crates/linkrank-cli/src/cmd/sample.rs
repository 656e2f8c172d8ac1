//! `linkrank sample` — shortest paths between randomly chosen pages.
//!
//! Titles are drawn with replacement, so a pair may repeat or have
//! `start == goal`. A failed query is reported inline and does not fail the
//! run.

use std::io::{self, Write};

use clap::Args;
use linkrank_core::config::SampleConfig;
use linkrank_core::{Graph, shortest_path};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, instrument};

use super::CommandContext;
use crate::output::{CliError, pretty_section, render_mode};
use crate::source::SourceArgs;

/// Pair-count and seed flags; each one overrides `[sample]` config.
#[derive(Args, Debug, Clone, Default)]
pub struct SampleOverrides {
    /// Number of random page pairs.
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Seed for a reproducible draw.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SampleOverrides {
    pub fn apply(&self, section: &SampleConfig) -> (usize, Option<u64>) {
        (
            self.count.unwrap_or(section.count),
            self.seed.or(section.seed),
        )
    }
}

/// Arguments for `linkrank sample`.
#[derive(Args, Debug, Default)]
pub struct SampleArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub sample: SampleOverrides,
}

/// One sampled query and its outcome.
#[derive(Debug, Serialize)]
pub struct SampledPath<'g> {
    pub start: &'g str,
    pub goal: &'g str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<&'g str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

impl SampledPath<'_> {
    /// The path joined by arrows, or the error message.
    pub fn outcome(&self) -> String {
        match (&self.path, &self.error) {
            (Some(path), _) => path.join(" -> "),
            (None, Some(err)) => format!("error: {}", err.message),
            (None, None) => String::new(),
        }
    }
}

/// Draw `count` title pairs and run a shortest-path query for each.
#[instrument(skip(graph))]
pub fn sample_paths(graph: &Graph, count: usize, seed: Option<u64>) -> Vec<SampledPath<'_>> {
    let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let pages = graph.pages();
    let mut samples = Vec::with_capacity(count);

    for _ in 0..count {
        let (Some(start), Some(goal)) = (pages.choose(&mut rng), pages.choose(&mut rng)) else {
            break;
        };
        let (start, goal) = (start.title.as_str(), goal.title.as_str());
        let sample = match shortest_path(graph, start, goal) {
            Ok(path) => SampledPath {
                start,
                goal,
                path: Some(path),
                error: None,
            },
            Err(err) => {
                debug!(start, goal, error = %err, "sampled query failed");
                SampledPath {
                    start,
                    goal,
                    path: None,
                    error: Some(CliError::with_code(err.to_string(), err.code())),
                }
            }
        };
        samples.push(sample);
    }
    samples
}

pub fn write_text(samples: &[SampledPath<'_>], w: &mut dyn Write) -> io::Result<()> {
    for sample in samples {
        writeln!(w, "{} -> {}: {}", sample.start, sample.goal, sample.outcome())?;
    }
    Ok(())
}

pub fn write_pretty(samples: &[SampledPath<'_>], w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Sampled shortest paths")?;
    for sample in samples {
        writeln!(w, "{} to {}", sample.start, sample.goal)?;
        writeln!(w, "  {}", sample.outcome())?;
    }
    writeln!(w)
}

/// Execute `linkrank sample`.
pub fn run_sample(args: &SampleArgs, ctx: &CommandContext<'_>) -> anyhow::Result<()> {
    let graph = args.source.load(ctx.config, ctx.cwd)?;
    let (count, seed) = args.sample.apply(&ctx.config.sample);
    let samples = sample_paths(&graph, count, seed);
    render_mode(
        ctx.output,
        &samples,
        |s, w| write_text(s, w),
        |s, w| write_pretty(s, w),
    )
}
