//! Writers for derived networks: Graphviz DOT for rendering and node-link
//! JSON that the loader reads back.

use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::graph::Network;

const NODE_COLOR: &str = "#1C8394";
const CENTER_COLOR: &str = "#FFA500";

/// The `k` highest-degree nodes. Ties go to the node inserted first.
fn top_by_degree(network: &Network, k: usize) -> HashSet<&str> {
    let mut ranked: Vec<(&str, usize)> = network.degrees().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(k).map(|(id, _)| id).collect()
}

/// DOT source for `network`. Node width grows with degree, `highlight` is
/// drawn in the center color, links between two permanent authors are red
/// and pen width follows the citation count.
///
/// With `label_top = Some(k)` only the `k` highest-degree nodes and the
/// highlighted node carry their id as label; `None` labels every node.
pub fn to_dot(network: &Network, highlight: Option<&str>, label_top: Option<usize>) -> String {
    let graph = network.graph();
    let labelled = label_top.map(|k| top_by_degree(network, k));
    format!(
        "{:?}",
        Dot::with_attr_getters(
            graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|g, edge| {
                let both_permanent =
                    g[edge.source()].is_permanent() && g[edge.target()].is_permanent();
                let color = if both_permanent { "red" } else { "black" };
                format!(
                    "color=\"{}\" penwidth={:.2}",
                    color,
                    edge.weight().citations() / 2.5
                )
            },
            &|g, (idx, author)| {
                let degree = g.edges(idx).count();
                let is_center = highlight == Some(author.id.as_str());
                let color = if is_center { CENTER_COLOR } else { NODE_COLOR };
                let shown = is_center
                    || labelled
                        .as_ref()
                        .map_or(true, |top| top.contains(author.id.as_str()));
                let label = if shown {
                    author.id.replace('"', "\\\"")
                } else {
                    String::new()
                };
                format!(
                    "label=\"{}\" style=filled fillcolor=\"{}\" width={:.2}",
                    label,
                    color,
                    0.2 + degree as f64 * 0.05
                )
            },
        )
    )
}

pub fn write_dot(
    network: &Network,
    highlight: Option<&str>,
    label_top: Option<usize>,
    path: &Path,
) -> Result<()> {
    std::fs::write(path, to_dot(network, highlight, label_top))
        .map_err(|e| NetworkError::io(path, e))
}

#[derive(Serialize)]
struct NodeLinkOut {
    directed: bool,
    multigraph: bool,
    nodes: Vec<Map<String, Value>>,
    links: Vec<Map<String, Value>>,
}

pub fn to_node_link(network: &Network) -> Result<Value> {
    let mut nodes = Vec::with_capacity(network.node_count());
    for author in network.authors() {
        let mut entry = Map::new();
        entry.insert("id".to_string(), Value::String(author.id.clone()));
        for (key, value) in &author.attrs {
            entry.insert(key.clone(), serde_json::to_value(value)?);
        }
        nodes.push(entry);
    }

    let mut links = Vec::with_capacity(network.edge_count());
    for (a, b, link) in network.links() {
        let mut entry = Map::new();
        entry.insert("source".to_string(), Value::String(a.to_string()));
        entry.insert("target".to_string(), Value::String(b.to_string()));
        for (key, value) in &link.attrs {
            entry.insert(key.clone(), serde_json::to_value(value)?);
        }
        links.push(entry);
    }

    Ok(serde_json::to_value(NodeLinkOut {
        directed: false,
        multigraph: false,
        nodes,
        links,
    })?)
}

pub fn write_node_link(network: &Network, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| NetworkError::io(path, e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &to_node_link(network)?)?;
    Ok(())
}
