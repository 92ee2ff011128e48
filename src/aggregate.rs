//! Union of all period snapshots into one network.

use tracing::info;

use crate::error::{NetworkError, Result};
use crate::graph::Network;
use crate::loader::Snapshot;

/// Adds every node and edge of `other` to `target`. Attributes of anything
/// already present are updated key by key, with `other` winning.
pub fn compose_into(target: &mut Network, other: &Network) {
    for author in other.authors() {
        target.merge_node(&author.id, author.attrs.clone());
    }
    for (a, b, link) in other.links() {
        target.merge_edge(a, b, link.clone());
    }
}

/// Composes the networks in order, starting from a copy of the first one.
pub fn aggregate<'a, I>(networks: I) -> Result<Network>
where
    I: IntoIterator<Item = &'a Network>,
{
    let mut networks = networks.into_iter();
    let mut aggregate = networks.next().ok_or(NetworkError::NothingToAggregate)?.clone();
    for network in networks {
        compose_into(&mut aggregate, network);
    }
    Ok(aggregate)
}

pub fn aggregate_snapshots(snapshots: &[Snapshot]) -> Result<Network> {
    let aggregate = aggregate(snapshots.iter().map(Snapshot::network))?;
    info!(
        "Aggregate network: {} nodes, {} edges",
        aggregate.node_count(),
        aggregate.edge_count()
    );
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttrValue, Attributes, Link, CITATION_KEY, PERMANENT_KEY};
    use std::collections::HashSet;

    fn edge_set(net: &Network) -> HashSet<(String, String)> {
        net.links()
            .map(|(a, b, _)| {
                let (x, y) = if a <= b { (a, b) } else { (b, a) };
                (x.to_string(), y.to_string())
            })
            .collect()
    }

    fn node_set(net: &Network) -> HashSet<String> {
        net.authors().map(|a| a.id.clone()).collect()
    }

    fn snapshot_a() -> Network {
        let mut net = Network::new();
        for id in ["1", "2", "3"] {
            net.ensure_node(id);
        }
        net.upsert_edge("1", "2", Link::default());
        net
    }

    fn snapshot_b() -> Network {
        let mut net = Network::new();
        for id in ["2", "3", "4"] {
            net.ensure_node(id);
        }
        net.upsert_edge("2", "3", Link::default());
        net.upsert_edge("3", "4", Link::default());
        net
    }

    fn flagged(value: bool) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert(PERMANENT_KEY.to_string(), AttrValue::Bool(value));
        attrs
    }

    #[test]
    fn test_aggregate_two_snapshots() {
        let (a, b) = (snapshot_a(), snapshot_b());
        let agg = aggregate([&a, &b]).unwrap();

        assert_eq!(agg.node_count(), 4);
        assert_eq!(agg.edge_count(), 3);
        assert!(agg.contains_edge("1", "2"));
        assert!(agg.contains_edge("2", "3"));
        assert!(agg.contains_edge("3", "4"));
        assert_eq!(agg.degree("3"), Some(2));
    }

    #[test]
    fn test_membership_is_order_independent() {
        let (a, b) = (snapshot_a(), snapshot_b());
        let forward = aggregate([&a, &b]).unwrap();
        let backward = aggregate([&b, &a]).unwrap();

        assert_eq!(node_set(&forward), node_set(&backward));
        assert_eq!(edge_set(&forward), edge_set(&backward));

        let mut union = node_set(&a);
        union.extend(node_set(&b));
        assert_eq!(node_set(&forward), union);
    }

    #[test]
    fn test_last_snapshot_wins_attributes() {
        let mut early = Network::new();
        early.upsert_node("x", flagged(true));
        let mut citations = Attributes::new();
        citations.insert(CITATION_KEY.to_string(), AttrValue::Int(1));
        citations.insert("venue".to_string(), AttrValue::Text("conf".to_string()));
        early.upsert_edge("x", "y", Link::with_attrs(citations));

        let mut late = Network::new();
        late.upsert_node("x", flagged(false));
        let mut recount = Attributes::new();
        recount.insert(CITATION_KEY.to_string(), AttrValue::Int(9));
        late.upsert_edge("y", "x", Link::with_attrs(recount));

        let agg = aggregate([&early, &late]).unwrap();
        assert!(!agg.author("x").unwrap().is_permanent());
        let link = agg.link("x", "y").unwrap();
        assert_eq!(link.citations(), 9.0);
        // keys only the early snapshot has survive
        assert_eq!(link.attrs["venue"], AttrValue::Text("conf".to_string()));

        let reversed = aggregate([&late, &early]).unwrap();
        assert!(reversed.author("x").unwrap().is_permanent());
        assert_eq!(reversed.link("x", "y").unwrap().citations(), 1.0);
    }

    #[test]
    fn test_later_snapshot_without_keys_keeps_earlier_values() {
        let mut early = Network::new();
        early.upsert_node("x", flagged(true));
        let mut cited = Attributes::new();
        cited.insert(CITATION_KEY.to_string(), AttrValue::Int(6));
        early.upsert_edge("x", "y", Link::with_attrs(cited));

        let mut late = Network::new();
        let mut labelled = Attributes::new();
        labelled.insert("label".to_string(), AttrValue::Text("X".to_string()));
        late.upsert_node("x", labelled);
        late.upsert_edge("x", "y", Link::default());

        let agg = aggregate([&early, &late]).unwrap();
        let x = agg.author("x").unwrap();
        assert!(x.is_permanent());
        assert_eq!(x.attrs["label"], AttrValue::Text("X".to_string()));
        assert_eq!(agg.link("x", "y").unwrap().citations(), 6.0);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let (a, b) = (snapshot_a(), snapshot_b());
        let _ = aggregate([&a, &b]).unwrap();
        assert_eq!(a.node_count(), 3);
        assert_eq!(a.edge_count(), 1);
        assert_eq!(b.edge_count(), 2);
    }

    #[test]
    fn test_empty_sequence_fails() {
        let none: Vec<&Network> = Vec::new();
        assert!(matches!(aggregate(none), Err(NetworkError::NothingToAggregate)));
        assert!(matches!(
            aggregate_snapshots(&[]),
            Err(NetworkError::NothingToAggregate)
        ));
    }
}
