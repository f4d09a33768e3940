//! CLI entry point for the bridge and torch solver.
//!
//! Usage:
//!   torch-bridge solve <puzzle.json> [options]
//!   torch-bridge solve --stdin [options]
//!   torch-bridge solve --entity A=1 --entity B=2 [options]
//!   torch-bridge graph <puzzle.json>
//!
//! Without a puzzle source the classic A=1, B=2, C=5, D=10 instance is used.
//!
//! Options:
//!   --format <json|text>   Output format for `solve` (default: json)
//!   --verbose              Log build and search progress to stderr

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use torch_bridge::{
    build, solve_puzzle, Configuration, Crossing, Edge, Entity, Graph, PuzzleConfig,
    PuzzleError, Result, Solution,
};

#[derive(Parser)]
#[command(name = "torch-bridge")]
#[command(about = "Minimum-time solver for the bridge and torch crossing puzzle")]
#[command(version)]
struct Cli {
    /// Log build and search progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the fastest way to get everyone across
    Solve {
        #[command(flatten)]
        source: PuzzleSource,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the full state graph as JSON
    Graph {
        #[command(flatten)]
        source: PuzzleSource,
    },
}

#[derive(Args)]
struct PuzzleSource {
    /// Path to puzzle JSON file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read puzzle from stdin instead of file
    #[arg(long, conflicts_with = "file")]
    stdin: bool,

    /// Inline entity as ID=DURATION, may be repeated
    #[arg(long = "entity", value_name = "ID=DURATION", conflicts_with_all = ["file", "stdin"])]
    entities: Vec<Entity>,

    /// Use the classic four-entity puzzle
    #[arg(long, conflicts_with_all = ["file", "stdin", "entities"])]
    classic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Output format for a solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_time: Option<u64>,
    path: Vec<Configuration>,
    crossings: Vec<Crossing>,
    nodes: usize,
    edges: usize,
    time_elapsed_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphOutput<'a> {
    node_count: usize,
    edge_count: usize,
    nodes: Vec<NodeOutput<'a>>,
}

#[derive(Debug, Serialize)]
struct NodeOutput<'a> {
    #[serde(flatten)]
    config: &'a Configuration,
    edges: Vec<&'a Edge>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let success = match cli.command {
        Commands::Solve { source, format } => {
            let result = load_puzzle(&source).and_then(|puzzle| solve_puzzle(&puzzle));
            if let Err(e) = &result {
                error!(reason = e.reason(), "{e}");
            }
            let printed = match format {
                OutputFormat::Json => print_json(&format_result(&result)),
                OutputFormat::Text => {
                    print!("{}", format_text(&result));
                    true
                }
            };
            printed && result.is_ok()
        }
        Commands::Graph { source } => match load_puzzle(&source).and_then(|p| build(&p)) {
            Ok(graph) => print_json(&format_graph(&graph)),
            Err(e) => {
                error!(reason = e.reason(), "{e}");
                false
            }
        },
    };

    std::process::exit(if success { 0 } else { 1 });
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Resolve the puzzle from whichever source was given
fn load_puzzle(source: &PuzzleSource) -> Result<PuzzleConfig> {
    let puzzle = if source.classic {
        PuzzleConfig::classic()
    } else if source.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        serde_json::from_str(&buffer)?
    } else if let Some(path) = &source.file {
        let json_content = fs::read_to_string(path)?;
        serde_json::from_str(&json_content)?
    } else if !source.entities.is_empty() {
        PuzzleConfig::new(source.entities.clone())
    } else {
        PuzzleConfig::classic()
    };

    info!(entities = puzzle.entities.len(), "puzzle loaded");
    Ok(puzzle)
}

fn print_json(value: &impl Serialize) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            false
        }
    }
}

fn format_result(result: &Result<Solution>) -> SolveOutput {
    match result {
        Ok(solution) => SolveOutput {
            found: true,
            reason: None,
            message: None,
            total_time: Some(solution.path.total_time()),
            path: solution.path.configurations().to_vec(),
            crossings: solution.path.crossings(),
            nodes: solution.stats.nodes,
            edges: solution.stats.edges,
            time_elapsed_ms: solution.stats.time_elapsed_ms,
        },
        Err(e) => SolveOutput {
            found: false,
            reason: Some(e.reason().to_string()),
            message: Some(e.to_string()),
            total_time: None,
            path: Vec::new(),
            crossings: Vec::new(),
            nodes: 0,
            edges: 0,
            time_elapsed_ms: 0,
        },
    }
}

/// Nodes sorted by configuration, each with its edges sorted by target
fn format_graph(graph: &Graph) -> GraphOutput<'_> {
    let mut nodes: Vec<NodeOutput> = graph
        .iter()
        .map(|(config, edges)| {
            let mut edges: Vec<&Edge> = edges.iter().collect();
            edges.sort_by(|a, b| a.to.cmp(&b.to));
            NodeOutput { config, edges }
        })
        .collect();
    nodes.sort_by(|a, b| a.config.cmp(b.config));

    GraphOutput {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        nodes,
    }
}

fn format_text(result: &Result<Solution>) -> String {
    let solution = match result {
        Ok(solution) => solution,
        Err(PuzzleError::GoalUnreachable) => return "Path not found.\n".to_string(),
        Err(e) => return format!("Error: {e}\n"),
    };

    let mut out = String::from("Path:\n");
    for config in solution.path.configurations() {
        out.push_str(&format!("  {config}\n"));
    }
    out.push_str("Crossings:\n");
    for crossing in solution.path.crossings() {
        out.push_str(&format!(
            "  {} -> {} ({})\n",
            crossing.movers.join(" + "),
            crossing.direction,
            crossing.duration
        ));
    }
    out.push_str(&format!("Total time: {}\n", solution.path.total_time()));
    out
}
