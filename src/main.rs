use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ledgerflow_config::ProjectionConfig;
use ledgerflow_graph::Graph;
use ledgerflow_ledger::SnapshotLedger;
use ledgerflow_projector::{DiagramSession, WorkflowProjector};

/// ledgerflow - Project ledger-resident state machines into diagram graphs
#[derive(Parser)]
#[command(name = "ledgerflow")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to a projection config file (JSON). Defaults apply when omitted.
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Project a record store snapshot and print the diagram as JSON
  Project {
    /// Path to the ledger snapshot file (JSON)
    snapshot: PathBuf,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
  },

  /// Project a record store snapshot and print nodes and edges as text
  Inspect {
    /// Path to the ledger snapshot file (JSON)
    snapshot: PathBuf,
  },
}

fn main() -> Result<()> {
  init_tracing();
  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Project { snapshot, compact }) => {
      let graph = run_projection(snapshot, cli.config)?;
      let layout = graph.to_json();
      if compact {
        println!("{}", serde_json::to_string(&layout)?);
      } else {
        println!("{}", serde_json::to_string_pretty(&layout)?);
      }
    }
    Some(Commands::Inspect { snapshot }) => {
      let graph = run_projection(snapshot, cli.config)?;
      print_graph(&graph);
    }
    None => {
      println!("ledgerflow - use --help to see available commands");
    }
  }

  Ok(())
}

/// Logs go to stderr so stdout stays machine readable.
fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

fn run_projection(snapshot: PathBuf, config: Option<PathBuf>) -> Result<Graph> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_projection_async(snapshot, config).await })
}

async fn run_projection_async(snapshot: PathBuf, config: Option<PathBuf>) -> Result<Graph> {
  let config = match config {
    Some(path) => load_config(&path).await?,
    None => ProjectionConfig::default(),
  };

  let ledger = SnapshotLedger::load(&snapshot)
    .await
    .with_context(|| format!("failed to load snapshot: {}", snapshot.display()))?;

  info!(
    snapshot = %snapshot.display(),
    address = ledger.address().unwrap_or("unknown"),
    "loaded record store"
  );

  let projector = WorkflowProjector::new(ledger, config);
  let mut session = DiagramSession::new(projector);
  let summary = session.load().await.context("projection failed")?;

  info!(
    nodes = summary.nodes,
    edges = summary.edges,
    dangling_edges = summary.dangling_edges,
    "projection completed"
  );

  Ok(session.graph().clone())
}

async fn load_config(path: &Path) -> Result<ProjectionConfig> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read config file: {}", path.display()))?;

  ProjectionConfig::from_json_str(&content)
    .with_context(|| format!("failed to parse config file: {}", path.display()))
}

fn print_graph(graph: &Graph) {
  for node in graph.nodes() {
    println!(
      "node {:>4}  {:<8} {}",
      node.id(),
      format!("{:?}", node.role).to_lowercase(),
      node.label()
    );
  }
  for edge in graph.edges() {
    let marker = if edge.animated() { " (animated)" } else { "" };
    println!(
      "edge {:>4}  {} -> {}  {}{}",
      edge.id(),
      edge.source_id(),
      edge.target_id(),
      edge.label(),
      marker
    );
  }
}
