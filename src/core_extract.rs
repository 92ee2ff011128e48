//! High-connectivity core of the aggregate network.
//!
//! The minimum degree X is the p-th percentile of the degree distribution,
//! interpolated linearly between order statistics and rounded up. The core is
//! the subgraph induced by the nodes of degree at least X.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::config::check_percentile;
use crate::error::{NetworkError, Result};
use crate::graph::Network;

#[derive(Debug, Clone)]
pub struct CoreExtraction {
    pub percentile: f64,
    /// Minimum degree a node needs to belong to the core.
    pub threshold: usize,
    pub core: Network,
    pub aggregate_density: f64,
    pub core_density: f64,
}

/// Linear-interpolation percentile of `values` (`p` in [0, 100]).
/// Returns `None` for an empty slice.
pub fn percentile(values: &[usize], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let low = sorted[lo] as f64;
    let high = sorted[hi] as f64;
    Some(low + (high - low) * (rank - lo as f64))
}

pub fn degree_threshold(network: &Network, p: f64) -> Result<usize> {
    check_percentile(p)?;
    let degrees: Vec<usize> = network.degrees().map(|(_, d)| d).collect();
    let value = percentile(&degrees, p).ok_or(NetworkError::EmptyNetwork)?;
    Ok(value.ceil() as usize)
}

/// Nodes with degree >= `threshold`, in network order.
pub fn nodes_at_least(network: &Network, threshold: usize) -> Vec<&str> {
    network
        .degrees()
        .filter(|&(_, d)| d >= threshold)
        .map(|(id, _)| id)
        .collect()
}

/// Subgraph induced by the nodes of degree >= `threshold`. Empty when the
/// threshold exceeds every degree.
pub fn core_subgraph(network: &Network, threshold: usize) -> Network {
    let selected: HashSet<&str> = nodes_at_least(network, threshold).into_iter().collect();
    network.induced_subgraph(&selected)
}

pub fn extract_core(network: &Network, p: f64) -> Result<CoreExtraction> {
    let threshold = degree_threshold(network, p)?;
    info!("Minimum degree X = {} (percentile {})", threshold, p);

    let core = core_subgraph(network, threshold);
    if core.is_empty() {
        warn!("No node reaches degree {}, the core is empty", threshold);
    }

    let extraction = CoreExtraction {
        percentile: p,
        threshold,
        aggregate_density: network.density(),
        core_density: core.density(),
        core,
    };
    info!(
        "Core: {} nodes, {} edges (density {:.4} vs {:.4} overall)",
        extraction.core.node_count(),
        extraction.core.edge_count(),
        extraction.core_density,
        extraction.aggregate_density
    );
    Ok(extraction)
}
