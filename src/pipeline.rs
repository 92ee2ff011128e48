//! End-to-end run: load, describe, aggregate, extract the core, analyse an ego.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::aggregate::aggregate_snapshots;
use crate::config::PipelineConfig;
use crate::core_extract::{extract_core, CoreExtraction};
use crate::ego::{analyze_ego, CenterChoice, EgoAnalysis};
use crate::error::{NetworkError, Result};
use crate::export::{write_dot, write_node_link};
use crate::graph::Network;
use crate::loader::{load_snapshots, Snapshot};
use crate::metrics::{period_metrics, PeriodMetrics};

/// Every product of a run. The aggregate is never mutated after it is built;
/// the core and ego networks are separate copies.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub snapshots: Vec<Snapshot>,
    pub periods: Vec<PeriodMetrics>,
    pub aggregate: Network,
    pub core: CoreExtraction,
    pub ego: EgoAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummary {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
}

impl NetworkSummary {
    fn of(network: &Network) -> Self {
        NetworkSummary {
            nodes: network.node_count(),
            edges: network.edge_count(),
            density: network.density(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoreSummary {
    pub percentile: f64,
    pub threshold: usize,
    #[serde(flatten)]
    pub network: NetworkSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct EgoSummary {
    pub center: String,
    pub choice: CenterChoice,
    pub radius: usize,
    pub first_hop_neighbors: usize,
    pub clustering: f64,
    #[serde(flatten)]
    pub network: NetworkSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub periods: Vec<PeriodMetrics>,
    pub aggregate: NetworkSummary,
    pub core: CoreSummary,
    pub ego: EgoSummary,
}

pub fn run(config: &PipelineConfig, dir: &Path) -> Result<Analysis> {
    config.validate()?;

    let snapshots = load_snapshots(dir, &config.input)?;
    let periods = period_metrics(
        &snapshots,
        config.input.base_year,
        &config.input.cycle_end_years,
    );
    let aggregate = aggregate_snapshots(&snapshots)?;
    let core = extract_core(&aggregate, config.core.percentile)?;
    let ego = analyze_ego(&aggregate, config.ego.center.as_deref(), config.ego.radius)?;

    Ok(Analysis {
        snapshots,
        periods,
        aggregate,
        core,
        ego,
    })
}

impl Analysis {
    pub fn report(&self) -> PipelineReport {
        PipelineReport {
            periods: self.periods.clone(),
            aggregate: NetworkSummary::of(&self.aggregate),
            core: CoreSummary {
                percentile: self.core.percentile,
                threshold: self.core.threshold,
                network: NetworkSummary::of(&self.core.core),
            },
            ego: EgoSummary {
                center: self.ego.center.clone(),
                choice: self.ego.choice.clone(),
                radius: self.ego.radius,
                first_hop_neighbors: self.ego.first_hop_neighbors,
                clustering: self.ego.clustering,
                network: NetworkSummary::of(&self.ego.ego),
            },
        }
    }

    /// Writes `aggregate`, `core` and `ego` files into the configured output
    /// directories.
    pub fn write_outputs(&self, config: &PipelineConfig) -> Result<()> {
        let outputs = [
            ("aggregate", &self.aggregate, None),
            ("core", &self.core.core, None),
            ("ego", &self.ego.ego, Some(self.ego.center.as_str())),
        ];
        if let Some(dir) = &config.output.dot_dir {
            std::fs::create_dir_all(dir).map_err(|e| NetworkError::io(dir, e))?;
            for (name, network, highlight) in &outputs {
                write_dot(
                    network,
                    *highlight,
                    config.output.label_top,
                    &dir.join(format!("{}.dot", name)),
                )?;
            }
            info!("Wrote DOT files to {}", dir.display());
        }
        if let Some(dir) = &config.output.json_dir {
            std::fs::create_dir_all(dir).map_err(|e| NetworkError::io(dir, e))?;
            for (name, network, _) in &outputs {
                write_node_link(network, &dir.join(format!("{}.json", name)))?;
            }
            info!("Wrote node-link files to {}", dir.display());
        }
        Ok(())
    }
}
