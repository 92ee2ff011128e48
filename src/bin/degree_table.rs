use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use coauthorship::config::InputConfig;
use coauthorship::degree_table::{degree_frame, degree_records, write_degree_table};
use coauthorship::loader::load_snapshots;

/// Export the degree of every node of every period as one long table
/// (CSV, or Parquet for a `.parquet` output).
#[derive(Parser)]
#[command(name = "degree_table", version)]
struct Cli {
    /// Directory holding one graph file per period
    dir: PathBuf,

    /// Output table
    output: PathBuf,

    /// Snapshot file extension (json or csv)
    #[arg(short, long, default_value = "json")]
    extension: String,

    /// First year used when filenames carry no year
    #[arg(long, default_value = "2010")]
    base_year: i32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let input = InputConfig {
        extension: cli.extension,
        base_year: cli.base_year,
        ..InputConfig::default()
    };
    let snapshots = load_snapshots(&cli.dir, &input)
        .with_context(|| format!("Failed to load snapshots from {}", cli.dir.display()))?;

    let records = degree_records(&snapshots);
    let mut df = degree_frame(&records)?;

    // print the first 5 rows
    println!("{:?}", df.head(Some(5)));

    write_degree_table(&mut df, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!("Wrote {} rows to {}", df.height(), cli.output.display());
    Ok(())
}
