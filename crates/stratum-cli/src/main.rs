#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use stratum_core::config::resolve_config;
use stratum_core::error::ErrorCode;
use stratum_core::ingest::IngestOptions;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "stratum: dependency-graph analyzer for implementation planning",
    long_about = "Reads symbol relationship tables (CSV) and computes which components \
                  can be implemented first and in what batched order the rest can follow."
)]
struct Cli {
    /// Enable debug logging for stratum crates.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the relationship CSV files (overrides `[input] dir`).
    #[arg(long, global = true, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Config file (default: ./stratum.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Abort on the first malformed input row instead of skipping it.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full analysis and write all output files",
        long_about = "Build the dependency graph, then write implementation_plan.json, \
                      api_reports/<api>.json and SUMMARY.txt into the output directory.",
        after_help = "EXAMPLES:\n    # Analyze ./codeql_results into ./analysis_output\n    stratum analyze\n\n    # Custom directories\n    stratum --input facts analyze --output out\n\n    # Emit machine-readable output\n    stratum analyze --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Show graph statistics",
        after_help = "EXAMPLES:\n    stratum stats\n    stratum stats --format json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "List nodes with no dependencies",
        long_about = "List leaf nodes (no dependencies), the natural starting points. \
                      With --roots, list nodes nothing depends on instead.",
        after_help = "EXAMPLES:\n    stratum leaves\n    stratum leaves --roots"
    )]
    Leaves(cmd::leaves::LeavesArgs),

    #[command(
        about = "Print the dependency-first implementation order",
        after_help = "EXAMPLES:\n    stratum order\n    stratum order --format json"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        about = "Print implementation layers",
        after_help = "EXAMPLES:\n    stratum layers\n    stratum layers --format json"
    )]
    Layers(cmd::layers::LayersArgs),

    #[command(
        about = "Show the dependency report for one node",
        after_help = "EXAMPLES:\n    stratum deps firebase::App::Create\n    stratum deps firebase::App::Create --format json"
    )]
    Deps(cmd::deps::DepsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("STRATUM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "stratum=debug,info"
        } else {
            "stratum=info,warn"
        })
    });

    let format = env::var("STRATUM_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = env::current_dir()?;
    let config = match resolve_config(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(err) => {
            let mode = resolve_output_mode(cli.format, cli.json, None);
            render_error(
                mode,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };

    let output = resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());
    let ctx = cmd::RunContext {
        input_dir: cli.input.clone().unwrap_or_else(|| config.input.dir.clone()),
        ingest: IngestOptions {
            strict: cli.strict || config.ingest.strict,
        },
        output,
        config,
    };
    debug!(input = %ctx.input_dir.display(), ?output, strict = ctx.ingest.strict, "resolved run context");

    match cli.command {
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, &ctx),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, &ctx),
        Commands::Leaves(ref args) => cmd::leaves::run_leaves(args, &ctx),
        Commands::Order(ref args) => cmd::order::run_order(args, &ctx),
        Commands::Layers(ref args) => cmd::layers::run_layers(args, &ctx),
        Commands::Deps(ref args) => cmd::deps::run_deps(args, &ctx),
    }
}
