//! Snapshot discovery and parsing.
//!
//! A snapshot directory holds one graph file per evaluation period. Files are
//! picked up by extension, ordered by filename and labelled from the leading
//! year of their name. Files that cannot be parsed are logged and skipped;
//! only a batch where nothing loads is an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::InputConfig;
use crate::error::{NetworkError, Result};
use crate::graph::{AttrValue, Attributes, Link, Network};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodLabel {
    Year(i32),
    Range(i32, i32),
}

impl PeriodLabel {
    /// Reads the label from a filename stem such as `2014` or `2013-2016_coauthors`.
    pub fn from_stem(stem: &str) -> Option<PeriodLabel> {
        let start = leading_year(stem)?;
        let rest = &stem[4..];
        match rest.strip_prefix('-').and_then(leading_year) {
            Some(end) => Some(PeriodLabel::Range(start, end)),
            None => Some(PeriodLabel::Year(start)),
        }
    }

    pub fn start_year(&self) -> i32 {
        match self {
            PeriodLabel::Year(y) | PeriodLabel::Range(y, _) => *y,
        }
    }
}

fn leading_year(s: &str) -> Option<i32> {
    let digits = s.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodLabel::Year(y) => write!(f, "{}", y),
            PeriodLabel::Range(a, b) => write!(f, "{}-{}", a, b),
        }
    }
}

impl Serialize for PeriodLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub label: PeriodLabel,
}

/// One loaded period. Immutable once built.
#[derive(Debug, Clone)]
pub struct Snapshot {
    label: PeriodLabel,
    path: PathBuf,
    network: Network,
}

impl Snapshot {
    pub fn new(label: PeriodLabel, path: impl Into<PathBuf>, network: Network) -> Self {
        Snapshot {
            label,
            path: path.into(),
            network,
        }
    }

    pub fn label(&self) -> PeriodLabel {
        self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn network(&self) -> &Network {
        &self.network
    }
}

/// Lists the snapshot files of `dir`, sorted by filename. If any name lacks a
/// leading year, all labels fall back to consecutive years from `base_year`.
pub fn discover_snapshots(dir: &Path, extension: &str, base_year: i32) -> Result<Vec<SnapshotFile>> {
    let extension = extension.trim_start_matches('.');
    let entries = std::fs::read_dir(dir).map_err(|e| NetworkError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| NetworkError::io(dir, e))?.path();
        let matches = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let parsed: Option<Vec<PeriodLabel>> = paths
        .iter()
        .map(|p| p.file_stem().and_then(|s| s.to_str()).and_then(PeriodLabel::from_stem))
        .collect();

    let labels = match parsed {
        Some(labels) => labels,
        None => {
            warn!(
                "Not every file in {} starts with a year, labelling from {}",
                dir.display(),
                base_year
            );
            (0..paths.len())
                .map(|i| PeriodLabel::Year(base_year + i as i32))
                .collect()
        }
    };

    Ok(paths
        .into_iter()
        .zip(labels)
        .map(|(path, label)| SnapshotFile { path, label })
        .collect())
}

/// Parses one graph file, choosing the format from its extension.
pub fn read_network(path: &Path) -> Result<Network> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("json") => read_node_link(path),
        Some("csv") => read_edge_list(path),
        _ => Err(NetworkError::parse(path, "unsupported graph file extension")),
    }
}

/// Loads every snapshot of `dir`. Unparseable files are skipped with a warning.
pub fn load_snapshots(dir: &Path, input: &InputConfig) -> Result<Vec<Snapshot>> {
    let files = discover_snapshots(dir, &input.extension, input.base_year)?;
    let mut snapshots = Vec::with_capacity(files.len());

    for file in files {
        match read_network(&file.path) {
            Ok(network) => {
                debug!(
                    "Loaded {} ({}): {} nodes, {} edges",
                    file.path.display(),
                    file.label,
                    network.node_count(),
                    network.edge_count()
                );
                snapshots.push(Snapshot::new(file.label, file.path, network));
            }
            Err(e) => warn!("Skipping snapshot: {}", e),
        }
    }

    if snapshots.is_empty() {
        return Err(NetworkError::EmptyBatch(dir.to_path_buf()));
    }
    info!("Loaded {} snapshots from {}", snapshots.len(), dir.display());
    Ok(snapshots)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(id: RawId) -> String {
        match id {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NodeLinkNode {
    id: RawId,
    #[serde(flatten)]
    attrs: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NodeLinkEdge {
    source: RawId,
    target: RawId,
    #[serde(flatten)]
    attrs: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NodeLinkDocument {
    #[serde(default)]
    nodes: Vec<NodeLinkNode>,
    #[serde(default, alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

fn attrs_from_json(raw: BTreeMap<String, Value>) -> Attributes {
    raw.into_iter()
        .filter_map(|(key, value)| AttrValue::from_json(value).map(|v| (key, v)))
        .collect()
}

fn read_node_link(path: &Path) -> Result<Network> {
    let file = File::open(path).map_err(|e| NetworkError::io(path, e))?;
    let doc: NodeLinkDocument = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| NetworkError::parse(path, e))?;

    let mut network = Network::new();
    for node in doc.nodes {
        let id: String = node.id.into();
        network.upsert_node(&id, attrs_from_json(node.attrs));
    }
    for edge in doc.links {
        let source: String = edge.source.into();
        let target: String = edge.target.into();
        let link = Link::with_attrs(attrs_from_json(edge.attrs));
        if network.upsert_edge(&source, &target, link).is_none() {
            debug!("Dropping self-loop on {} in {}", source, path.display());
        }
    }
    Ok(network)
}

fn read_edge_list(path: &Path) -> Result<Network> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| NetworkError::parse(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| NetworkError::parse(path, e))?
        .clone();

    let source_col = headers.iter().position(|h| h == "source");
    let target_col = headers.iter().position(|h| h == "target");
    let (source_col, target_col) = match (source_col, target_col) {
        (Some(s), Some(t)) => (s, t),
        _ => return Err(NetworkError::parse(path, "missing source/target columns")),
    };

    let mut network = Network::new();
    for record in reader.records() {
        let record = record.map_err(|e| NetworkError::parse(path, e))?;
        let (source, target) = match (record.get(source_col), record.get(target_col)) {
            (Some(s), Some(t)) if !s.is_empty() && !t.is_empty() => (s, t),
            _ => return Err(NetworkError::parse(path, "row without both endpoints")),
        };

        let mut source_attrs = Attributes::new();
        let mut target_attrs = Attributes::new();
        let mut edge_attrs = Attributes::new();
        for (i, cell) in record.iter().enumerate() {
            if i == source_col || i == target_col || cell.is_empty() {
                continue;
            }
            let header = &headers[i];
            let value = AttrValue::parse(cell);
            if let Some(key) = header.strip_prefix("source_") {
                source_attrs.insert(key.to_string(), value);
            } else if let Some(key) = header.strip_prefix("target_") {
                target_attrs.insert(key.to_string(), value);
            } else {
                edge_attrs.insert(header.to_string(), value);
            }
        }

        // an author shows up on many rows; within one file its attributes accumulate
        network.merge_node(source, source_attrs);
        network.merge_node(target, target_attrs);
        if network.upsert_edge(source, target, Link::with_attrs(edge_attrs)).is_none() {
            debug!("Dropping self-loop on {} in {}", source, path.display());
        }
    }
    Ok(network)
}
