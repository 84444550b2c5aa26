use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kgviz::analytics::{self, PartitionStrategy};
use kgviz::config::AppConfig;
use kgviz::io::{FormatRegistry, save_snapshot};
use kgviz::layout::{ForceLayout, NodeSpec, PositionedNode, distinct_nodes};
use kgviz::sample::{self, SampleOptions};
use kgviz::server;

/// Force-directed layout and analytics for knowledge graphs.
#[derive(Parser, Debug)]
#[command(name = "kgviz")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Canvas width (overrides config)
    #[arg(long, global = true)]
    width: Option<f64>,

    /// Canvas height (overrides config)
    #[arg(long, global = true)]
    height: Option<f64>,

    /// Seed for reproducible placement (overrides config)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lay out a graph snapshot and write positioned nodes and edges
    Layout {
        /// Input snapshot (.json, .yaml, .yml)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the computed layout
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (json, yaml)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Print analytics for a graph snapshot as JSON
    Analyze {
        /// Input snapshot (.json, .yaml, .yml)
        #[arg(short, long)]
        input: PathBuf,

        /// Community partition strategy
        #[arg(long, value_parser = parse_partition)]
        partition: Option<PartitionStrategy>,
    },
    /// Write a synthetic graph snapshot
    Sample {
        /// Number of entities
        #[arg(short, long, default_value = "50")]
        nodes: usize,

        /// Number of relationships (defaults to 1.5 per entity)
        #[arg(short, long)]
        edges: Option<usize>,

        /// Output file (.json, .yaml, .yml)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Serve a live layout over HTTP
    Serve {
        /// Initial snapshot to load
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Port to run the server on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn parse_partition(value: &str) -> Result<PartitionStrategy, String> {
    match value {
        "positional" => Ok(PartitionStrategy::Positional),
        "label-propagation" => Ok(PartitionStrategy::LabelPropagation),
        other => Err(format!(
            "unknown partition '{other}' (expected positional or label-propagation)"
        )),
    }
}

impl Cli {
    /// Load the config file and apply flag overrides
    fn app_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = AppConfig::load_or_default(self.config.as_deref())?;
        if let Some(width) = self.width {
            config.layout.width = width;
        }
        if let Some(height) = self.height {
            config.layout.height = height;
        }
        if let Some(seed) = self.seed {
            config.layout.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_layout(config: &AppConfig, input: &Path, output: &Path, format: &str) -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();
    let writer = registry
        .writer_for_format(format)
        .with_context(|| format!("unsupported output format: {format}"))?;
    let snapshot = registry
        .read_snapshot(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let (nodes, edges) = snapshot.to_layout_input();
    let mut layout = ForceLayout::with_graph(nodes, edges, config.layout.clone());
    let ticks = layout.run_until_settled();

    writer
        .write(&layout.snapshot(), output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(ticks, nodes = layout.nodes().len(), output = %output.display(), "wrote layout");
    Ok(())
}

fn run_analyze(
    config: &AppConfig,
    input: &Path,
    partition: Option<PartitionStrategy>,
) -> anyhow::Result<()> {
    let snapshot = FormatRegistry::with_defaults()
        .read_snapshot(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let mut analytics_config = config.analytics.clone();
    if let Some(partition) = partition {
        analytics_config.partition = partition;
    }

    let (specs, edges) = snapshot.to_layout_input();
    let nodes: Vec<PositionedNode> = distinct_nodes(specs)
        .into_iter()
        .map(NodeSpec::unplaced)
        .collect();
    let summary = analytics::analyze(&nodes, &edges, &analytics_config);

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_sample(
    seed: Option<u64>,
    nodes: usize,
    edges: Option<usize>,
    output: &Path,
) -> anyhow::Result<()> {
    let mut options = SampleOptions::with_nodes(nodes);
    if let Some(edges) = edges {
        options.relationships = edges;
    }
    options.seed = seed;

    let snapshot = sample::generate(&options);
    save_snapshot(&snapshot, output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(
        nodes = snapshot.nodes.len(),
        relationships = snapshot.relationships.len(),
        output = %output.display(),
        "wrote sample graph"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,kgviz=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = cli.app_config()?;

    match cli.command {
        Commands::Layout {
            input,
            output,
            format,
        } => run_layout(&config, &input, &output, &format)?,
        Commands::Analyze { input, partition } => run_analyze(&config, &input, partition)?,
        Commands::Sample {
            nodes,
            edges,
            output,
        } => run_sample(config.layout.seed, nodes, edges, &output)?,
        Commands::Serve { input, port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config, input).await?;
        }
    }

    Ok(())
}
