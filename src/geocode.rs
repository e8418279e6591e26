// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{normalize, Graph, KDTree, Node};

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a street (or any other place description) to a node of the graph.
pub trait Geocoder: Send + Sync {
    /// Returns the id of the matching node, or `None` if nothing matches.
    fn resolve(&self, street: &str) -> Result<Option<i64>, GeocodeError>;
}

/// [Geocoder] working entirely over the names present in a [Graph].
///
/// A street name resolves to the node of that street closest to the street's center.
/// Text of the form `"lat, lon"` resolves to the graph node closest to that position.
#[derive(Debug, Clone)]
pub struct StreetGeocoder {
    streets: HashMap<String, Vec<Node>>,
    tree: Option<KDTree>,
}

impl StreetGeocoder {
    pub fn new(g: &Graph) -> Self {
        let mut streets: HashMap<String, Vec<Node>> = HashMap::default();

        for (from_id, edge) in g.iter_edges() {
            for name in &edge.names {
                let nodes = streets.entry(normalize(name)).or_default();
                nodes.extend(g.get_node(from_id));
                nodes.extend(g.get_node(edge.to));
            }
        }

        for nodes in streets.values_mut() {
            nodes.sort_by_key(|n| n.id);
            nodes.dedup_by_key(|n| n.id);
        }

        Self {
            streets,
            tree: KDTree::from_nodes(g.iter().cloned()),
        }
    }

    fn resolve_street(&self, street: &str) -> Option<i64> {
        let nodes = self.streets.get(&normalize(street))?;
        if nodes.is_empty() {
            return None;
        }

        let count = nodes.len() as f32;
        let lat = nodes.iter().map(|n| n.lat).sum::<f32>() / count;
        let lon = nodes.iter().map(|n| n.lon).sum::<f32>() / count;

        nodes
            .iter()
            .min_by(|a, b| {
                crate::earth_distance(lat, lon, a.lat, a.lon)
                    .total_cmp(&crate::earth_distance(lat, lon, b.lat, b.lon))
            })
            .map(|n| n.id)
    }

    fn resolve_position(&self, text: &str) -> Option<i64> {
        let (lat, lon) = parse_position(text)?;
        self.tree
            .as_ref()
            .map(|tree| tree.find_nearest_node(lat, lon).id)
    }
}

impl Geocoder for StreetGeocoder {
    fn resolve(&self, street: &str) -> Result<Option<i64>, GeocodeError> {
        Ok(self
            .resolve_street(street)
            .or_else(|| self.resolve_position(street)))
    }
}

fn parse_position(text: &str) -> Option<(f32, f32)> {
    let (lat, lon) = text.split_once(',')?;
    let lat: f32 = lat.trim().parse().ok()?;
    let lon: f32 = lon.trim().parse().ok()?;

    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Some((lat, lon))
    } else {
        None
    }
}
