//! Problem Explorer CLI - inspect the categorized problem tree of a snapshot

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use problem_explorer_core::{
    refresh_loop, CategoryIndex, CategoryNode, Difficulty, Dimension, DisplayAttributes, Explorer,
    ExplorerConfig, IconKey, JsonSnapshotFetcher, NodeKind, SessionFlag, TreeAdapter, TreeItem,
    WatcherStatus,
};

#[derive(Parser)]
#[command(name = "problem-explorer")]
#[command(about = "Categorized problem tree over a problem snapshot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the explorer config file
    #[arg(short, long, global = true, default_value = "./explorer.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the explorer tree
    Tree {
        /// JSON file with an array of problem records
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Render as if nobody were signed in
        #[arg(long)]
        signed_out: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show accepted / failed / total counts for a category
    Stats {
        /// JSON file with an array of problem records
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Grouping dimension (difficulty, tag, company)
        #[arg(short, long)]
        dimension: String,

        /// Group key; omit for the whole dimension
        #[arg(short, long)]
        key: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Refresh periodically and report every tree change
    Watch {
        /// JSON file with an array of problem records
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Refresh interval in seconds (overrides the config)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExplorerConfig::open(&cli.config)?;

    match cli.command {
        Commands::Tree {
            snapshot,
            signed_out,
            format,
        } => {
            let explorer = load_explorer(&snapshot, &config).await?;
            let adapter = TreeAdapter::new(SessionFlag::new(!signed_out), &config);
            let index = explorer.snapshot();
            let tree = render(&adapter, &index, None);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                for node in &tree {
                    print_node(node, 0);
                }
            }
        }

        Commands::Stats {
            snapshot,
            dimension,
            key,
            format,
        } => {
            let explorer = load_explorer(&snapshot, &config).await?;
            let dimension = parse_dimension(&dimension)?;
            let kind = match key {
                Some(key) => NodeKind::Subgroup(dimension, subgroup_key(dimension, key)?),
                None => NodeKind::TopLevel(dimension.category()),
            };
            let stats = explorer.aggregate_stats(&kind);

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats);
            }
        }

        Commands::Watch { snapshot, interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .filter(|d| !d.is_zero())
                .or_else(|| config.refresh_interval())
                .unwrap_or(Duration::from_secs(60));
            run_watch(&snapshot, &config, interval).await?;
        }
    }

    Ok(())
}

async fn load_explorer(snapshot: &Path, config: &ExplorerConfig) -> Result<Explorer<JsonSnapshotFetcher>> {
    tracing::info!("Loading snapshot {:?}...", snapshot);
    let explorer = Explorer::new(JsonSnapshotFetcher::new(snapshot), config);
    explorer
        .refresh()
        .await
        .with_context(|| format!("Failed to load snapshot {:?}", snapshot))?;
    Ok(explorer)
}

fn parse_dimension(name: &str) -> Result<Dimension> {
    match name.to_ascii_lowercase().as_str() {
        "difficulty" => Ok(Dimension::Difficulty),
        "tag" => Ok(Dimension::Tag),
        "company" => Ok(Dimension::Company),
        other => bail!("Unknown dimension {:?} (expected difficulty, tag or company)", other),
    }
}

/// Difficulty keys are matched case-insensitively and must name a level.
fn subgroup_key(dimension: Dimension, key: String) -> Result<String> {
    if dimension != Dimension::Difficulty {
        return Ok(key);
    }
    match Difficulty::from_key(&key) {
        Some(difficulty) => Ok(difficulty.as_str().to_string()),
        None => bail!("Unknown difficulty {:?} (expected easy, medium or hard)", key),
    }
}

#[derive(Serialize)]
struct RenderedNode {
    #[serde(flatten)]
    item: TreeItem,
    #[serde(skip)]
    icon: Option<IconKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<RenderedNode>,
}

fn render(
    adapter: &TreeAdapter<SessionFlag>,
    index: &CategoryIndex,
    parent: Option<&CategoryNode>,
) -> Vec<RenderedNode> {
    adapter
        .children(index, parent)
        .iter()
        .map(|node| {
            let item = adapter.tree_item(index, node);
            let children = if item.collapsible {
                render(adapter, index, Some(node))
            } else {
                Vec::new()
            };
            RenderedNode {
                item,
                icon: DisplayAttributes::of(node).icon,
                children,
            }
        })
        .collect()
}

fn print_node(node: &RenderedNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = match node.icon {
        Some(IconKey::CheckEasy) => "✓".green(),
        Some(IconKey::CheckMedium) => "✓".yellow(),
        Some(IconKey::CheckHard) => "✓".red(),
        Some(IconKey::Cross) => "✗".red(),
        Some(IconKey::Lock) => "🔒".normal(),
        Some(IconKey::Blank) => " ".normal(),
        None if node.item.collapsible => "▸".bright_blue(),
        None => "→".bright_blue(),
    };

    match &node.item.tooltip {
        Some(tooltip) => println!(
            "{}{} {} {}",
            indent,
            marker,
            node.item.label.bold(),
            format!("({})", tooltip.replace('\n', ", ")).dimmed()
        ),
        None => println!("{}{} {}", indent, marker, node.item.label),
    }

    for child in &node.children {
        print_node(child, depth + 1);
    }
}

async fn run_watch(snapshot: &Path, config: &ExplorerConfig, interval: Duration) -> Result<()> {
    let explorer = Arc::new(load_explorer(snapshot, config).await?);
    let status = Arc::new(Mutex::new(WatcherStatus::default()));
    let (stop, shutdown) = watch::channel(false);
    let mut changes = explorer.subscribe();

    let handle = tokio::spawn(refresh_loop(explorer.clone(), interval, shutdown, status.clone()));

    println!(
        "Watching {:?} every {}s (Ctrl-C to stop)",
        snapshot,
        interval.as_secs()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = changes.recv() => {
                if let Err(RecvError::Closed) = received {
                    break;
                }
                let index = explorer.snapshot();
                let stats = index.aggregate_stats(&NodeKind::Root);
                println!(
                    "{} {} problems, {} accepted, {} failed",
                    "Tree changed:".bright_green(),
                    stats.total,
                    stats.accepted,
                    stats.failed
                );
            }
        }
    }

    let _ = stop.send(true);
    handle.await?;

    let status = status.lock().unwrap_or_else(|e| e.into_inner()).clone();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
