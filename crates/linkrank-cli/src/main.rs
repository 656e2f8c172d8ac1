#![forbid(unsafe_code)]

mod cmd;
mod output;
mod source;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use linkrank_core::config::load_config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "linkrank: page/link graph analytics",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to ./linkrank.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run every query against one dataset",
        long_about = "Print the longest title, the most linked page, shortest paths between \
                      randomly sampled pages and the most popular page.",
        after_help = "EXAMPLES:\n    linkrank analyze --dataset small\n\n    # Reproducible sample with 10 pairs\n    linkrank analyze --dataset medium --count 10 --seed 42"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Longest page title",
        after_help = "EXAMPLES:\n    linkrank longest-title --dataset small\n\n    # Include titles containing '_'\n    linkrank longest-title --dataset small --no-separator"
    )]
    LongestTitle(cmd::longest::LongestTitleArgs),

    #[command(about = "Page(s) with the most incoming links")]
    MostLinked(cmd::linked::MostLinkedArgs),

    #[command(
        about = "Shortest hyperlink path between two titles",
        after_help = "EXAMPLES:\n    linkrank path --dataset small Google Facebook"
    )]
    Path(cmd::path::PathArgs),

    #[command(
        about = "Random-surfer importance scores",
        after_help = "EXAMPLES:\n    linkrank rank --dataset small --top 20\n\n    # Stop after 30 seconds and print the best scores so far\n    linkrank rank --dataset large --timeout-secs 30"
    )]
    Rank(cmd::rank::RankArgs),

    #[command(about = "Shortest paths between randomly chosen pages")]
    Sample(cmd::sample::SampleArgs),

    #[command(about = "Structural summary of the graph")]
    Stats(cmd::stats::StatsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LINKRANK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "linkrank=debug,info"
        } else {
            "linkrank=info,warn"
        })
    });

    let format = env::var("LINKRANK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let cwd = env::current_dir()?;
    let config = load_config(cli.config.as_deref(), &cwd)?;
    let ctx = cmd::CommandContext {
        output,
        config: &config,
        cwd: &cwd,
    };

    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &ctx),
        Commands::LongestTitle(args) => cmd::longest::run_longest_title(args, &ctx),
        Commands::MostLinked(args) => cmd::linked::run_most_linked(args, &ctx),
        Commands::Path(args) => cmd::path::run_path(args, &ctx),
        Commands::Rank(args) => cmd::rank::run_rank(args, &ctx),
        Commands::Sample(args) => cmd::sample::run_sample(args, &ctx),
        Commands::Stats(args) => cmd::stats::run_stats(args, &ctx),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = resolve_output_mode(cli.format, cli.json);
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            if let Err(render_err) = render_error(output, &CliError::from(&err)) {
                eprintln!("error: {err:#} (while rendering: {render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
