// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde_json::{json, Value};

use crate::{Coord, ExcludedEdge, Graph, Route};

/// Default number of excluded edges above which they are no longer drawn individually.
pub const DEFAULT_RENDER_CEILING: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rendering failed: {0}")]
    Failed(String),
}

/// Shape of a street avoided by the route.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedGeometry {
    pub names: Vec<String>,
    pub occurrences: u64,
    pub coordinates: Vec<Coord>,
}

/// Everything needed to draw a computed route on a map.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInput {
    pub origin: Coord,
    pub destination: Coord,
    pub route: Vec<Coord>,

    /// Individual excluded edges; left empty when there were too many of them.
    pub excluded: Vec<ExcludedGeometry>,

    /// Number of excluded edges, regardless of whether they are listed in `excluded`.
    pub excluded_total: usize,
}

impl RenderInput {
    /// Collects the coordinates of a route and of the excluded edges from the unfiltered graph.
    ///
    /// Excluded edges are only listed individually if there are fewer than `ceiling` of them.
    /// Edges without geometry are drawn as a straight line between their endpoints.
    /// Returns `None` if the route is empty or references nodes missing from the graph.
    pub fn new(
        g: &Graph,
        route: &Route,
        excluded: &[ExcludedEdge],
        ceiling: usize,
    ) -> Option<Self> {
        let route_coords = route
            .nodes
            .iter()
            .map(|&id| g.get_node(id).map(|n| n.coord()))
            .collect::<Option<Vec<_>>>()?;

        let origin = *route_coords.first()?;
        let destination = *route_coords.last()?;

        let excluded_geometries = if excluded.len() < ceiling {
            excluded
                .iter()
                .filter_map(|x| {
                    let coordinates = match g.get_edge(x.id) {
                        Some(edge) if !edge.geometry.is_empty() => edge.geometry.clone(),
                        _ => vec![g.get_node(x.id.from)?.coord(), g.get_node(x.id.to)?.coord()],
                    };
                    Some(ExcludedGeometry {
                        names: x.names.clone(),
                        occurrences: x.max_occurrences,
                        coordinates,
                    })
                })
                .collect()
        } else {
            Vec::default()
        };

        Some(Self {
            origin,
            destination,
            route: route_coords,
            excluded: excluded_geometries,
            excluded_total: excluded.len(),
        })
    }
}

/// Turns a [RenderInput] into an artifact which can be displayed to the user.
/// The artifact is opaque to the routing engine.
pub trait Renderer: Send + Sync {
    fn render(&self, input: &RenderInput) -> Result<Value, RenderError>;
}

/// [Renderer] producing a [GeoJSON](https://geojson.org/) FeatureCollection.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonRenderer;

fn position(c: &Coord) -> Value {
    json!([c.lon, c.lat])
}

fn line_string(coords: &[Coord]) -> Value {
    json!({
        "type": "LineString",
        "coordinates": coords.iter().map(position).collect::<Vec<_>>(),
    })
}

impl Renderer for GeoJsonRenderer {
    fn render(&self, input: &RenderInput) -> Result<Value, RenderError> {
        let mut features = vec![
            json!({
                "type": "Feature",
                "properties": {"role": "origin"},
                "geometry": {"type": "Point", "coordinates": position(&input.origin)},
            }),
            json!({
                "type": "Feature",
                "properties": {"role": "destination"},
                "geometry": {"type": "Point", "coordinates": position(&input.destination)},
            }),
            json!({
                "type": "Feature",
                "properties": {"role": "route"},
                "geometry": line_string(&input.route),
            }),
        ];

        features.extend(input.excluded.iter().map(|x| {
            json!({
                "type": "Feature",
                "properties": {
                    "role": "excluded",
                    "names": x.names,
                    "occurrences": x.occurrences,
                },
                "geometry": line_string(&x.coordinates),
            })
        }));

        Ok(json!({
            "type": "FeatureCollection",
            "properties": {"excluded_total": input.excluded_total},
            "features": features,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{edge, node};
    use crate::EdgeId;

    fn test_graph() -> Graph {
        let mut g = Graph::new();
        g.set_node(node(1, 1.0, 10.0));
        g.set_node(node(2, 2.0, 20.0));
        g.set_node(node(3, 3.0, 30.0));
        g.add_edge(1, edge(2, 1.0, "Rua A".into()));
        let mut curved = edge(3, 1.0, "Rua B".into());
        curved.geometry = vec![
            Coord { lat: 2.0, lon: 20.0 },
            Coord { lat: 2.5, lon: 26.0 },
            Coord { lat: 3.0, lon: 30.0 },
        ];
        g.add_edge(2, curved);
        g
    }

    fn excluded(from: i64, to: i64, name: &str) -> ExcludedEdge {
        ExcludedEdge {
            id: EdgeId { from, to, key: 0 },
            names: vec![name.to_string()],
            max_occurrences: 9,
        }
    }

    #[test]
    fn input_collects_coordinates() {
        let g = test_graph();
        let route = Route { nodes: vec![1, 2] };
        let both = [excluded(2, 3, "Rua B"), excluded(1, 2, "Rua A")];
        let input = RenderInput::new(&g, &route, &both, 10).unwrap();

        assert_eq!(input.origin, Coord { lat: 1.0, lon: 10.0 });
        assert_eq!(input.destination, Coord { lat: 2.0, lon: 20.0 });
        assert_eq!(input.route.len(), 2);
        assert_eq!(input.excluded_total, 2);
        assert_eq!(input.excluded[0].coordinates.len(), 3);
        assert_eq!(input.excluded[1].coordinates.len(), 2);
    }

    #[test]
    fn input_respects_ceiling() {
        let g = test_graph();
        let route = Route { nodes: vec![1, 2] };
        let many = [excluded(2, 3, "Rua B"), excluded(1, 2, "Rua A")];

        let input = RenderInput::new(&g, &route, &many, 2).unwrap();
        assert!(input.excluded.is_empty());
        assert_eq!(input.excluded_total, 2);

        let input = RenderInput::new(&g, &route, &many, 3).unwrap();
        assert_eq!(input.excluded.len(), 2);
    }

    #[test]
    fn input_requires_known_nodes() {
        let g = test_graph();
        assert!(RenderInput::new(&g, &Route { nodes: vec![] }, &[], 10).is_none());
        assert!(RenderInput::new(&g, &Route { nodes: vec![1, 9] }, &[], 10).is_none());
    }

    #[test]
    fn geojson() {
        let g = test_graph();
        let route = Route { nodes: vec![1, 2] };
        let input = RenderInput::new(&g, &route, &[excluded(2, 3, "Rua B")], 10).unwrap();
        let out = GeoJsonRenderer.render(&input).unwrap();

        assert_eq!(out["type"], "FeatureCollection");
        let features = out["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([10.0, 1.0]));
        assert_eq!(features[2]["geometry"]["coordinates"], json!([[10.0, 1.0], [20.0, 2.0]]));
        assert_eq!(features[3]["properties"]["names"], json!(["Rua B"]));
        assert_eq!(features[3]["properties"]["occurrences"], 9);
    }
}
