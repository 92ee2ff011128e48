//! Ego-network analysis around a single author.

use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{info, warn};

use crate::error::{NetworkError, Result};
use crate::graph::Network;

/// How the center of an ego network was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CenterChoice {
    /// The caller's node was present and used as is.
    Requested,
    /// No node was requested; the maximum-degree node was used.
    MaxDegree,
    /// The requested node is not in the network; the maximum-degree node was used.
    Substituted { requested: String },
}

#[derive(Debug, Clone)]
pub struct EgoAnalysis {
    pub center: String,
    pub choice: CenterChoice,
    pub radius: usize,
    /// Neighbors of the center in the full network.
    pub first_hop_neighbors: usize,
    pub ego: Network,
    pub density: f64,
    /// Local clustering coefficient of the center inside the ego network.
    pub clustering: f64,
}

/// Node of maximum degree. Ties go to the node inserted first.
pub fn max_degree_node(network: &Network) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (id, degree) in network.degrees() {
        match best {
            Some((_, d)) if d >= degree => {}
            _ => best = Some((id, degree)),
        }
    }
    best.map(|(id, _)| id)
}

pub fn select_center(network: &Network, requested: Option<&str>) -> Result<(String, CenterChoice)> {
    let fallback = max_degree_node(network).ok_or(NetworkError::EmptyNetwork)?;
    Ok(match requested {
        Some(id) if network.contains_node(id) => (id.to_string(), CenterChoice::Requested),
        Some(id) => {
            warn!("Node {} is not in the network, using {} instead", id, fallback);
            (
                fallback.to_string(),
                CenterChoice::Substituted {
                    requested: id.to_string(),
                },
            )
        }
        None => (fallback.to_string(), CenterChoice::MaxDegree),
    })
}

/// Hop distance from `center` to every node within `radius` hops.
pub fn within_radius(network: &Network, center: &str, radius: usize) -> HashMap<String, usize> {
    let graph = network.graph();
    let Some(start) = network.index_of(center) else {
        return HashMap::new();
    };

    let mut dist = HashMap::new();
    let mut queue = VecDeque::new();
    dist.insert(start, 0usize);
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        let d = dist[&node];
        if d == radius {
            continue;
        }
        for next in graph.neighbors(node) {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }

    dist.into_iter()
        .map(|(idx, d)| (graph[idx].id.clone(), d))
        .collect()
}

/// Subgraph induced by `center` and every node within `radius` hops of it.
pub fn ego_network(network: &Network, center: &str, radius: usize) -> Network {
    let reached = within_radius(network, center, radius);
    let keep: HashSet<&str> = reached.keys().map(String::as_str).collect();
    network.induced_subgraph(&keep)
}

/// Fraction of the node's neighbor pairs that are themselves linked.
/// 0 for nodes with fewer than two neighbors or absent from the network.
pub fn local_clustering(network: &Network, id: &str) -> f64 {
    let neighbors = network.neighbors(id);
    if neighbors.len() < 2 {
        return 0.0;
    }

    let mut linked_pairs = 0;
    for (i, a) in neighbors.iter().enumerate() {
        for b in &neighbors[i + 1..] {
            if network.contains_edge(a, b) {
                linked_pairs += 1;
            }
        }
    }
    let possible = neighbors.len() * (neighbors.len() - 1) / 2;
    linked_pairs as f64 / possible as f64
}

pub fn analyze_ego(network: &Network, requested: Option<&str>, radius: usize) -> Result<EgoAnalysis> {
    let (center, choice) = select_center(network, requested)?;
    let ego = ego_network(network, &center, radius);
    let first_hop_neighbors = network.neighbors(&center).len();

    let analysis = EgoAnalysis {
        first_hop_neighbors,
        density: ego.density(),
        clustering: local_clustering(&ego, &center),
        center,
        choice,
        radius,
        ego,
    };
    info!(
        "Ego network of {} (radius {}): {} neighbors, {} nodes, density {:.4}, clustering {:.4}",
        analysis.center,
        radius,
        analysis.first_hop_neighbors,
        analysis.ego.node_count(),
        analysis.density,
        analysis.clustering
    );
    Ok(analysis)
}
