//! Undirected co-authorship network backed by petgraph.
//!
//! Nodes are authors keyed by an opaque string id, edges are co-authorship
//! links. Both carry a free-form attribute map. Node iteration always follows
//! insertion order, which is what every "first node" tie-break in this crate
//! relies on.

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Node attribute flagging a permanent member of the programme.
pub const PERMANENT_KEY: &str = "is_permanent";
/// Edge attribute holding the number of citations of a link.
pub const CITATION_KEY: &str = "citation_num";

pub type Attributes = BTreeMap<String, AttrValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Nested objects and arrays, kept as they were read.
    Json(Value),
}

impl AttrValue {
    /// Types a raw text cell: bool, then integer, then float, then text.
    pub fn parse(raw: &str) -> AttrValue {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            AttrValue::Bool(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            AttrValue::Bool(false)
        } else if let Ok(i) = trimmed.parse::<i64>() {
            AttrValue::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            AttrValue::Float(f)
        } else {
            AttrValue::Text(raw.to_string())
        }
    }

    /// Converts a JSON attribute value. `null` carries no value and yields `None`.
    pub fn from_json(value: Value) -> Option<AttrValue> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(AttrValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(AttrValue::Int(i)),
                None => n.as_f64().map(AttrValue::Float),
            },
            Value::String(s) => Some(AttrValue::Text(s)),
            nested => Some(AttrValue::Json(nested)),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::Int(i) => Some(*i != 0),
            AttrValue::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            AttrValue::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Text(s) => s.trim().parse().ok(),
            AttrValue::Bool(_) | AttrValue::Json(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: String,
    pub attrs: Attributes,
}

impl Author {
    pub fn is_permanent(&self) -> bool {
        self.attrs
            .get(PERMANENT_KEY)
            .and_then(AttrValue::as_bool)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Link {
    pub attrs: Attributes,
}

impl Link {
    pub fn with_attrs(attrs: Attributes) -> Self {
        Link { attrs }
    }

    /// Citation count of the link, 1 when the attribute is missing.
    pub fn citations(&self) -> f64 {
        self.attrs
            .get(CITATION_KEY)
            .and_then(AttrValue::as_f64)
            .unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: UnGraph<Author, Link>,
    index: HashMap<String, NodeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the node, or replaces its whole attribute map if it exists.
    pub fn upsert_node(&mut self, id: &str, attrs: Attributes) -> NodeIndex {
        match self.index.get(id) {
            Some(&idx) => {
                self.graph[idx].attrs = attrs;
                idx
            }
            None => self.insert_node(id, attrs),
        }
    }

    /// Returns the node's index, inserting it without attributes if missing.
    pub fn ensure_node(&mut self, id: &str) -> NodeIndex {
        match self.index.get(id) {
            Some(&idx) => idx,
            None => self.insert_node(id, Attributes::new()),
        }
    }

    fn insert_node(&mut self, id: &str, attrs: Attributes) -> NodeIndex {
        let idx = self.graph.add_node(Author {
            id: id.to_string(),
            attrs,
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Adds the edge (and any missing endpoint), or replaces the attribute
    /// map of an existing edge. Self-loops are rejected and yield `None`.
    pub fn upsert_edge(&mut self, a: &str, b: &str, link: Link) -> Option<EdgeIndex> {
        if a == b {
            return None;
        }
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        match self.graph.find_edge(ia, ib) {
            Some(edge) => {
                self.graph[edge] = link;
                Some(edge)
            }
            None => Some(self.graph.add_edge(ia, ib, link)),
        }
    }

    /// Inserts the node, or updates its attributes key by key: incoming
    /// values overwrite, keys only the existing node has are kept.
    pub fn merge_node(&mut self, id: &str, attrs: Attributes) -> NodeIndex {
        match self.index.get(id) {
            Some(&idx) => {
                self.graph[idx].attrs.extend(attrs);
                idx
            }
            None => self.insert_node(id, attrs),
        }
    }

    /// Edge counterpart of [`Network::merge_node`]. Self-loops yield `None`.
    pub fn merge_edge(&mut self, a: &str, b: &str, link: Link) -> Option<EdgeIndex> {
        if a == b {
            return None;
        }
        let ia = self.ensure_node(a);
        let ib = self.ensure_node(b);
        match self.graph.find_edge(ia, ib) {
            Some(edge) => {
                self.graph[edge].attrs.extend(link.attrs);
                Some(edge)
            }
            None => Some(self.graph.add_edge(ia, ib, link)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn contains_edge(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => self.graph.contains_edge(ia, ib),
            _ => false,
        }
    }

    pub fn author(&self, id: &str) -> Option<&Author> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn link(&self, a: &str, b: &str) -> Option<&Link> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.graph.find_edge(ia, ib).map(|edge| &self.graph[edge])
    }

    pub fn degree(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&idx| self.graph.edges(idx).count())
    }

    /// Degree of every node, in insertion order.
    pub fn degrees(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (self.graph[idx].id.as_str(), self.graph.edges(idx).count()))
    }

    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(&idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn authors(&self) -> impl Iterator<Item = &Author> + '_ {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    pub fn links(&self) -> impl Iterator<Item = (&str, &str, &Link)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
                edge.weight(),
            )
        })
    }

    /// Node-induced subgraph: keeps the selected nodes (in this network's
    /// order) and exactly the edges whose endpoints are both selected.
    pub fn induced_subgraph(&self, keep: &HashSet<&str>) -> Network {
        let mut sub = Network::new();
        for author in self.authors() {
            if keep.contains(author.id.as_str()) {
                sub.upsert_node(&author.id, author.attrs.clone());
            }
        }
        for (a, b, link) in self.links() {
            if keep.contains(a) && keep.contains(b) {
                sub.upsert_edge(a, b, link.clone());
            }
        }
        sub
    }

    /// 2|E| / (|V| (|V| - 1)), and 0 for networks with fewer than two nodes.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n <= 1 {
            return 0.0;
        }
        2.0 * self.edge_count() as f64 / (n as f64 * (n as f64 - 1.0))
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub(crate) fn graph(&self) -> &UnGraph<Author, Link> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_network() -> Network {
        let mut net = Network::new();
        net.upsert_edge("1", "2", Link::default());
        net.upsert_edge("2", "3", Link::default());
        net.upsert_edge("3", "4", Link::default());
        net
    }

    #[test]
    fn test_upsert_edge_adds_endpoints() {
        let net = path_network();
        assert_eq!(net.node_count(), 4);
        assert_eq!(net.edge_count(), 3);
        assert!(net.contains_edge("2", "1"));
        assert_eq!(net.degree("3"), Some(2));
        assert_eq!(net.degree("9"), None);
    }

    #[test]
    fn test_upsert_edge_replaces_attributes() {
        let mut net = Network::new();
        let mut first = Attributes::new();
        first.insert(CITATION_KEY.to_string(), AttrValue::Int(2));
        first.insert("note".to_string(), AttrValue::Text("old".to_string()));
        net.upsert_edge("a", "b", Link::with_attrs(first));

        let mut second = Attributes::new();
        second.insert(CITATION_KEY.to_string(), AttrValue::Int(7));
        net.upsert_edge("b", "a", Link::with_attrs(second.clone()));

        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.link("a", "b").unwrap().attrs, second);
        assert_eq!(net.link("a", "b").unwrap().citations(), 7.0);
    }

    #[test]
    fn test_merge_keeps_unrelated_keys() {
        let mut net = Network::new();
        let mut early = Attributes::new();
        early.insert(PERMANENT_KEY.to_string(), AttrValue::Bool(true));
        net.upsert_node("x", early);
        let mut late = Attributes::new();
        late.insert("label".to_string(), AttrValue::Text("X".to_string()));
        net.merge_node("x", late);

        let author = net.author("x").unwrap();
        assert!(author.is_permanent());
        assert_eq!(author.attrs["label"], AttrValue::Text("X".to_string()));

        let mut cited = Attributes::new();
        cited.insert(CITATION_KEY.to_string(), AttrValue::Int(6));
        cited.insert("venue".to_string(), AttrValue::Text("conf".to_string()));
        net.merge_edge("x", "y", Link::with_attrs(cited));
        let mut recount = Attributes::new();
        recount.insert(CITATION_KEY.to_string(), AttrValue::Int(8));
        net.merge_edge("y", "x", Link::with_attrs(recount));
        net.merge_edge("x", "y", Link::default());

        let link = net.link("x", "y").unwrap();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(link.citations(), 8.0);
        assert_eq!(link.attrs["venue"], AttrValue::Text("conf".to_string()));
        assert!(net.merge_edge("x", "x", Link::default()).is_none());
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let mut net = Network::new();
        assert!(net.upsert_edge("a", "a", Link::default()).is_none());
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn test_degrees_follow_insertion_order() {
        let net = path_network();
        let degrees: Vec<_> = net.degrees().collect();
        assert_eq!(degrees, vec![("1", 1), ("2", 2), ("3", 2), ("4", 1)]);
    }

    #[test]
    fn test_induced_subgraph_is_strict() {
        let net = path_network();
        let keep: HashSet<&str> = ["1", "2", "4"].into_iter().collect();
        let sub = net.induced_subgraph(&keep);
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.edge_count(), 1);
        assert!(sub.contains_edge("1", "2"));
        assert!(!sub.contains_node("3"));
        // the parent is untouched
        assert_eq!(net.edge_count(), 3);
    }

    #[test]
    fn test_density() {
        assert_eq!(Network::new().density(), 0.0);

        let mut single = Network::new();
        single.ensure_node("x");
        assert_eq!(single.density(), 0.0);

        let net = path_network();
        assert_eq!(net.density(), 0.5);
    }

    #[test]
    fn test_density_ignores_labels() {
        let net = path_network();
        let mut relabeled = Network::new();
        for (a, b, link) in net.links() {
            relabeled.upsert_edge(&format!("n{}", a), &format!("n{}", b), link.clone());
        }
        assert_eq!(net.density(), relabeled.density());
    }

    #[test]
    fn test_attr_value_parse() {
        assert_eq!(AttrValue::parse("True"), AttrValue::Bool(true));
        assert_eq!(AttrValue::parse("12"), AttrValue::Int(12));
        assert_eq!(AttrValue::parse("2.5"), AttrValue::Float(2.5));
        assert_eq!(AttrValue::parse("abc"), AttrValue::Text("abc".to_string()));
        assert_eq!(AttrValue::Text("false".to_string()).as_bool(), Some(false));
    }

    #[test]
    fn test_attr_value_from_json() {
        assert_eq!(AttrValue::from_json(Value::Null), None);
        assert_eq!(
            AttrValue::from_json(serde_json::json!(3)),
            Some(AttrValue::Int(3))
        );
        assert_eq!(
            AttrValue::from_json(serde_json::json!(2.5)),
            Some(AttrValue::Float(2.5))
        );
        let viz = serde_json::json!({"size": 3.0});
        let value = AttrValue::from_json(viz.clone()).unwrap();
        assert_eq!(value, AttrValue::Json(viz));
        assert_eq!(value.as_f64(), None);
        assert_eq!(value.as_bool(), None);
    }

    #[test]
    fn test_permanent_flag_defaults_to_false() {
        let mut net = Network::new();
        let mut attrs = Attributes::new();
        attrs.insert(PERMANENT_KEY.to_string(), AttrValue::Bool(true));
        net.upsert_node("p", attrs);
        net.ensure_node("q");
        assert!(net.author("p").unwrap().is_permanent());
        assert!(!net.author("q").unwrap().is_permanent());
    }
}
