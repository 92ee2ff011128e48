//! Descriptive statistics of each period snapshot.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

use crate::error::{NetworkError, Result};
use crate::graph::Network;
use crate::loader::{PeriodLabel, Snapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub density: f64,
    pub nodes: usize,
    pub edges: usize,
    pub mean_degree: f64,
    /// Degree -> number of nodes with that degree.
    pub degree_distribution: BTreeMap<usize, usize>,
}

pub fn network_metrics(network: &Network) -> Result<NetworkMetrics> {
    if network.is_empty() {
        return Err(NetworkError::EmptyNetwork);
    }
    let mut degree_distribution = BTreeMap::new();
    let mut total = 0;
    for (_, degree) in network.degrees() {
        total += degree;
        *degree_distribution.entry(degree).or_insert(0) += 1;
    }
    Ok(NetworkMetrics {
        density: network.density(),
        nodes: network.node_count(),
        edges: network.edge_count(),
        mean_degree: total as f64 / network.node_count() as f64,
        degree_distribution,
    })
}

/// An evaluation cycle, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationCycle {
    pub start: i32,
    pub end: i32,
}

impl fmt::Display for EvaluationCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl Serialize for EvaluationCycle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Cycle containing `year`. The first cycle opens at `base_year`, each later
/// one the year after the previous end.
pub fn cycle_for(year: i32, base_year: i32, end_years: &[i32]) -> Option<EvaluationCycle> {
    let mut ends = end_years.to_vec();
    ends.sort_unstable();
    let mut start = base_year;
    for end in ends {
        if end < start {
            continue;
        }
        if (start..=end).contains(&year) {
            return Some(EvaluationCycle { start, end });
        }
        start = end + 1;
    }
    None
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodMetrics {
    pub period: PeriodLabel,
    pub cycle: Option<EvaluationCycle>,
    #[serde(flatten)]
    pub metrics: NetworkMetrics,
}

/// Metrics for every snapshot that has at least one node.
pub fn period_metrics(snapshots: &[Snapshot], base_year: i32, end_years: &[i32]) -> Vec<PeriodMetrics> {
    let mut rows = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        match network_metrics(snapshot.network()) {
            Ok(metrics) => rows.push(PeriodMetrics {
                period: snapshot.label(),
                cycle: cycle_for(snapshot.label().start_year(), base_year, end_years),
                metrics,
            }),
            Err(e) => warn!("No metrics for {}: {}", snapshot.path().display(), e),
        }
    }
    rows
}
