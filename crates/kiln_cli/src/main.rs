//! Kiln CLI, the command-line interface for the Kiln build accelerator.
//!
//! Provides `kiln rewrite` to swap cache-valid modules for their prebuilt
//! artifacts and plan builds for the rest, and `kiln graph` to print the
//! module dependency graph observed along the way.

#![warn(missing_docs)]

mod graph;
mod pipeline;
mod rewrite;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Kiln: prebuilt-artifact substitution for modular builds.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln modular build accelerator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `kiln.toml` file or the directory containing it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a substitution pass and report the rewritten workspace.
    Rewrite(RewriteArgs),
    /// Print the module dependency graph observed by a pass.
    Graph(GraphArgs),
}

/// Arguments for the `kiln rewrite` subcommand.
#[derive(Parser, Debug)]
pub struct RewriteArgs {
    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the JSON build plan to this file.
    #[arg(long)]
    pub plan: Option<String>,

    /// Treat these module paths as cache misses (e.g. `--invalidate :lib`).
    #[arg(long, num_args = 1..)]
    pub invalidate: Vec<String>,
}

/// Arguments for the `kiln graph` subcommand.
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Output format for the graph.
    #[arg(short, long, value_enum, default_value_t = GraphFormat::Dot)]
    pub format: GraphFormat,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Graph output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// Graphviz DOT.
    Dot,
    /// JSON adjacency map.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Rewrite(ref args) => rewrite::run(args, &global),
        Command::Graph(ref args) => graph::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr `tracing` subscriber. `RUST_LOG` overrides the flags.
fn init_logging(global: &GlobalArgs) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(default_log_level(global)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn default_log_level(global: &GlobalArgs) -> &'static str {
    if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}
