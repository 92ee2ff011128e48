use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use coauthorship::ego::CenterChoice;
use coauthorship::{run, PipelineConfig};

/// Aggregate period snapshots of a co-authorship network, extract its
/// high-degree core and analyse an ego network.
#[derive(Parser)]
#[command(name = "coauthorship", version)]
struct Cli {
    /// Directory holding one graph file per period
    dir: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Degree percentile defining the core threshold
    #[arg(short, long)]
    percentile: Option<f64>,

    /// Center of the ego network (defaults to the maximum-degree node)
    #[arg(long)]
    center: Option<String>,

    /// Hop radius of the ego network
    #[arg(short, long)]
    radius: Option<usize>,

    /// Snapshot file extension (json or csv)
    #[arg(short, long)]
    extension: Option<String>,

    /// Write Graphviz files of the aggregate, core and ego networks here
    #[arg(long)]
    dot_dir: Option<PathBuf>,

    /// Write node-link JSON files of the aggregate, core and ego networks here
    #[arg(long)]
    json_dir: Option<PathBuf>,

    /// Label only this many highest-degree nodes in DOT files
    #[arg(long)]
    label_top: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(p) = self.percentile {
            config.core.percentile = p;
        }
        if let Some(center) = &self.center {
            config.ego.center = Some(center.clone());
        }
        if let Some(radius) = self.radius {
            config.ego.radius = radius;
        }
        if let Some(ext) = &self.extension {
            config.input.extension = ext.clone();
        }
        if let Some(dir) = &self.dot_dir {
            config.output.dot_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.json_dir {
            config.output.json_dir = Some(dir.clone());
        }
        if let Some(k) = self.label_top {
            config.output.label_top = Some(k);
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.pipeline_config()?;
    let analysis = run(&config, &cli.dir)
        .with_context(|| format!("Analysis of {} failed", cli.dir.display()))?;
    analysis.write_outputs(&config)?;

    let report = analysis.report();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Metrics per period:");
    for row in &report.periods {
        let cycle = row.cycle.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
        println!("  {} (cycle {})", row.period, cycle);
        println!("    Density: {:.4}", row.metrics.density);
        println!("    Nodes: {}", row.metrics.nodes);
        println!("    Edges: {}", row.metrics.edges);
        println!("    Mean degree: {:.2}", row.metrics.mean_degree);
        println!("    Degree distribution: {:?}", row.metrics.degree_distribution);
    }
    println!("{}", "-".repeat(40));

    println!(
        "Aggregate network: {} nodes, {} edges",
        report.aggregate.nodes, report.aggregate.edges
    );
    println!(
        "X = {} (percentile {} of the degree distribution)",
        report.core.threshold, report.core.percentile
    );
    println!(
        "Core subgraph: {} nodes, {} edges",
        report.core.network.nodes, report.core.network.edges
    );
    if report.core.network.nodes == 0 {
        println!("  No node reaches degree {}", report.core.threshold);
    }
    println!("Aggregate density: {:.4}", report.aggregate.density);
    println!("Core density: {:.4}", report.core.network.density);

    let ego = &report.ego;
    match &ego.choice {
        CenterChoice::Requested => println!("Ego center: {}", ego.center),
        CenterChoice::MaxDegree => println!("Ego center: {} (maximum degree)", ego.center),
        CenterChoice::Substituted { requested } => println!(
            "Ego center: {} ({} not found, using the maximum-degree node)",
            ego.center, requested
        ),
    }
    println!("  Radius: {}", ego.radius);
    println!("  Neighbors: {}", ego.first_hop_neighbors);
    println!("  Ego network nodes: {}", ego.network.nodes);
    println!("  Ego network density: {:.4}", ego.network.density);
    println!("  Clustering coefficient: {:.4}", ego.clustering);

    Ok(())
}
