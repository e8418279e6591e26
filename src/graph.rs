// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, EdgeId, Node};
use std::collections::btree_map::{BTreeMap, Entry};

/// Represents a road network as a set of [Nodes](Node)
/// and [Edges](Edge) between them.
///
/// The graph is a directed multigraph: several edges may connect the same
/// pair of nodes, each with its own `key`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph(pub(crate) BTreeMap<i64, (Node, Vec<Edge>)>);

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|(_, edges)| edges.len()).sum()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.0.values().map(|(node, _)| node)
    }

    /// Returns an iterator over all [Edges](Edge) together with the id of their source node.
    pub fn iter_edges(&self) -> impl Iterator<Item = (i64, &Edge)> {
        self.0
            .iter()
            .flat_map(|(&from_id, (_, edges))| edges.iter().map(move |e| (from_id, e)))
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.0.get(&id).map(|&(node, _)| node)
    }

    /// Creates or updates a [Node] with `node.id`.
    ///
    /// All outgoing and incoming edges are preserved.
    pub fn set_node(&mut self, node: Node) {
        match self.0.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                e.get_mut().0 = node;
            }
        }
    }

    /// Deletes a [Node] with a given `id`.
    ///
    /// While all outgoing edges are removed, incoming edges are preserved
    /// (as this would require a walk over all nodes in the graph).
    pub fn delete_node(&mut self, id: i64) {
        self.0.remove(&id);
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id.
    pub fn get_edges(&self, from_id: i64) -> &[Edge] {
        self.0
            .get(&from_id)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Retrieves an [Edge] by its identity.
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.get_edges(id.from)
            .iter()
            .find(|e| e.to == id.to && e.key == id.key)
    }

    /// Returns all parallel [Edges](Edge) from one node to another.
    pub fn edges_between(&self, from_id: i64, to_id: i64) -> impl Iterator<Item = &Edge> {
        self.get_edges(from_id).iter().filter(move |e| e.to == to_id)
    }

    /// Returns the [Edge] with the lowest travel time from one node to another.
    pub fn cheapest_edge(&self, from_id: i64, to_id: i64) -> Option<&Edge> {
        self.edges_between(from_id, to_id)
            .min_by(|a, b| a.travel_time.total_cmp(&b.travel_time))
    }

    /// Adds an [Edge] starting at a node with a given id.
    ///
    /// The edge `key` is overwritten with the next free key among the edges leading
    /// to the same node. Returns the identity of the new edge, or `None` if the
    /// source node doesn't exist.
    pub fn add_edge(&mut self, from_id: i64, mut edge: Edge) -> Option<EdgeId> {
        debug_assert!(edge.travel_time.is_finite() && edge.travel_time >= 0.0);

        let (_, edges) = self.0.get_mut(&from_id)?;
        edge.key = edges
            .iter()
            .filter(|e| e.to == edge.to)
            .map(|e| e.key + 1)
            .max()
            .unwrap_or(0);

        let id = EdgeId {
            from: from_id,
            to: edge.to,
            key: edge.key,
        };
        edges.push(edge);
        Some(id)
    }

    /// Keeps only the edges for which `keep` returns true.
    /// The closure receives the id of the source node and the edge.
    /// Nodes are never removed.
    pub fn retain_edges<F: FnMut(i64, &Edge) -> bool>(&mut self, mut keep: F) {
        for (&from_id, (_, edges)) in self.0.iter_mut() {
            edges.retain(|e| keep(from_id, e));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::StreetNames;

    pub(crate) fn node(id: i64, lat: f32, lon: f32) -> Node {
        Node { id, lat, lon }
    }

    pub(crate) fn edge(to: i64, travel_time: f32, names: StreetNames) -> Edge {
        Edge {
            to,
            key: 0,
            travel_time,
            names,
            geometry: Vec::default(),
        }
    }

    #[test]
    fn parallel_edges_get_distinct_keys() {
        let mut g = Graph::new();
        g.set_node(node(1, 0.0, 0.0));
        g.set_node(node(2, 0.0, 0.01));

        let a = g.add_edge(1, edge(2, 10.0, "Rua A".into())).unwrap();
        let b = g.add_edge(1, edge(2, 5.0, "Rua B".into())).unwrap();
        assert_eq!(a.key, 0);
        assert_eq!(b.key, 1);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges_between(1, 2).count(), 2);

        let cheapest = g.cheapest_edge(1, 2).unwrap();
        assert_eq!(cheapest.key, 1);
        assert_eq!(cheapest.names, StreetNames::from("Rua B"));
        assert!(g.cheapest_edge(2, 1).is_none());
    }

    #[test]
    fn add_edge_requires_source_node() {
        let mut g = Graph::new();
        g.set_node(node(1, 0.0, 0.0));
        assert!(g.add_edge(7, edge(1, 1.0, StreetNames::None)).is_none());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn get_edge_by_identity() {
        let mut g = Graph::new();
        g.set_node(node(1, 0.0, 0.0));
        g.set_node(node(2, 0.0, 0.01));
        g.set_node(node(3, 0.01, 0.0));
        let a = g.add_edge(1, edge(2, 10.0, "Rua A".into())).unwrap();
        let b = g.add_edge(1, edge(2, 5.0, "Rua B".into())).unwrap();
        let c = g.add_edge(1, edge(3, 1.0, StreetNames::None)).unwrap();

        assert_eq!((a.key, b.key, c.key), (0, 1, 0));
        assert_eq!(g.get_edge(a).unwrap().names, StreetNames::from("Rua A"));
        assert_eq!(g.get_edge(b).unwrap().names, StreetNames::from("Rua B"));
        assert!(g.get_edge(EdgeId { from: 1, to: 2, key: 2 }).is_none());
        assert!(g.add_edge(9, edge(1, 1.0, StreetNames::None)).is_none());
    }

    #[test]
    fn retain_edges_keeps_nodes() {
        let mut g = Graph::new();
        g.set_node(node(1, 0.0, 0.0));
        g.set_node(node(2, 0.0, 0.01));
        g.add_edge(1, edge(2, 1.0, "Rua A".into()));
        g.add_edge(2, edge(1, 1.0, "Rua A".into()));

        g.retain_edges(|from, _| from != 1);
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.get_edges(1).is_empty());
        assert_eq!(g.iter_edges().map(|(from, e)| (from, e.to)).collect::<Vec<_>>(), [(2, 1)]);
    }
}
