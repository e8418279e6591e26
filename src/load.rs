// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::compress::decompressed;
use crate::osm;
use crate::{Coord, Edge, Graph, Node, StreetNames};

/// Format of a road network file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    /// Guess the compression and the format from the content.
    #[default]
    Auto,

    /// Uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML).
    OsmXml,

    /// OSM XML compressed with gzip.
    OsmXmlGz,

    /// OSM XML compressed with bzip2.
    OsmXmlBz2,

    /// A pre-built graph, as a JSON document with `nodes` and `edges` arrays.
    /// May be compressed with gzip or bzip2.
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("{path}: {1}", path = .0.display())]
    Open(PathBuf, #[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Osm(#[from] osm::Error),

    #[error("invalid JSON graph: {0}")]
    Json(#[from] serde_json::Error),

    #[error("edge {from} -> {to} has invalid travel time {travel_time}")]
    InvalidTravelTime { from: i64, to: i64, travel_time: f32 },

    #[error("edge {from} -> {to} references an unknown node {node}")]
    UnknownNode { from: i64, to: i64, node: i64 },
}

#[derive(Debug, Deserialize)]
struct JsonGraph {
    nodes: Vec<Node>,
    edges: Vec<JsonEdge>,
}

#[derive(Debug, Deserialize)]
struct JsonEdge {
    from: i64,
    to: i64,
    travel_time: f32,

    #[serde(default)]
    names: StreetNames,

    #[serde(default)]
    geometry: Vec<Coord>,
}

/// Loads a road network [Graph] from a file at the provided path.
///
/// OSM data is interpreted with the [drive profile](osm::DRIVE_PROFILE).
pub fn load_graph<P: AsRef<Path>>(path: P, format: GraphFormat) -> Result<Graph, LoadError> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| LoadError::Open(path.to_path_buf(), e))?;
    let g = load_graph_from_io(f, format)?;
    log::info!(
        "loaded {} nodes and {} edges from {}",
        g.len(),
        g.edge_count(),
        path.display()
    );
    Ok(g)
}

/// Loads a road network [Graph] from a stream.
pub fn load_graph_from_io<R: io::Read>(
    reader: R,
    format: GraphFormat,
) -> Result<Graph, LoadError> {
    match format {
        GraphFormat::Auto => {
            let mut b = decompressed(io::BufReader::new(reader))?;
            if starts_with_object(&mut b)? {
                load_json(b)
            } else {
                load_osm(b, osm::FileFormat::Xml)
            }
        }
        GraphFormat::OsmXml => load_osm(reader, osm::FileFormat::Xml),
        GraphFormat::OsmXmlGz => load_osm(reader, osm::FileFormat::XmlGz),
        GraphFormat::OsmXmlBz2 => load_osm(reader, osm::FileFormat::XmlBz2),
        GraphFormat::Json => load_json(decompressed(io::BufReader::new(reader))?),
    }
}

/// Checks whether the first non-whitespace byte in the buffer opens a JSON object.
fn starts_with_object<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<bool> {
    let head = reader.fill_buf()?;
    Ok(head.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'{'))
}

fn load_osm<R: io::Read>(reader: R, file_format: osm::FileFormat) -> Result<Graph, LoadError> {
    let mut g = Graph::default();
    let options = osm::Options {
        profile: &osm::DRIVE_PROFILE,
        file_format,
        bbox: [0.0; 4],
    };
    osm::add_features_from_io(&mut g, &options, reader)?;
    Ok(g)
}

fn load_json<R: io::Read>(reader: R) -> Result<Graph, LoadError> {
    let data: JsonGraph = serde_json::from_reader(reader)?;

    let mut g = Graph::default();
    for n in data.nodes {
        g.set_node(n);
    }

    for e in data.edges {
        if !e.travel_time.is_finite() || e.travel_time < 0.0 {
            return Err(LoadError::InvalidTravelTime {
                from: e.from,
                to: e.to,
                travel_time: e.travel_time,
            });
        }

        if g.get_node(e.to).is_none() {
            return Err(LoadError::UnknownNode {
                from: e.from,
                to: e.to,
                node: e.to,
            });
        }

        let edge = Edge {
            to: e.to,
            key: 0,
            travel_time: e.travel_time,
            names: e.names,
            geometry: e.geometry,
        };
        if g.add_edge(e.from, edge).is_none() {
            return Err(LoadError::UnknownNode {
                from: e.from,
                to: e.to,
                node: e.from,
            });
        }
    }

    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const GRID_XML: &[u8] = include_bytes!("osm/reader/test_fixtures/grid.osm");

    const TRIANGLE_JSON: &str = r#"{
        "nodes": [
            {"id": 1, "lat": -8.05, "lon": -34.90},
            {"id": 2, "lat": -8.05, "lon": -34.89},
            {"id": 3, "lat": -8.04, "lon": -34.89}
        ],
        "edges": [
            {"from": 1, "to": 2, "travel_time": 10.0, "names": "Rua A"},
            {"from": 1, "to": 2, "travel_time": 7.5, "names": ["Rua A", "Rua B"]},
            {"from": 2, "to": 3, "travel_time": 4.0, "names": null,
             "geometry": [{"lat": -8.05, "lon": -34.89}, {"lat": -8.04, "lon": -34.89}]},
            {"from": 3, "to": 1, "travel_time": 12.0, "osmid": 1234}
        ]
    }"#;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn check_triangle(g: &Graph) {
        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_count(), 4);

        let parallel: Vec<_> = g.edges_between(1, 2).collect();
        assert_eq!(parallel.len(), 2);
        assert_eq!(parallel[0].key, 0);
        assert_eq!(parallel[1].key, 1);
        assert_eq!(
            g.cheapest_edge(1, 2).unwrap().names,
            StreetNames::Many(vec!["Rua A".to_string(), "Rua B".to_string()]),
        );

        let e = g.cheapest_edge(2, 3).unwrap();
        assert_eq!(e.names, StreetNames::None);
        assert_eq!(e.geometry.len(), 2);

        let e = g.cheapest_edge(3, 1).unwrap();
        assert_eq!(e.names, StreetNames::None);
        assert!(e.geometry.is_empty());
    }

    #[test]
    fn json_graph() {
        let g = load_graph_from_io(TRIANGLE_JSON.as_bytes(), GraphFormat::Json).unwrap();
        check_triangle(&g);
    }

    #[test]
    fn json_graph_auto() {
        let g = load_graph_from_io(TRIANGLE_JSON.as_bytes(), GraphFormat::Auto).unwrap();
        check_triangle(&g);

        let compressed = gzip(TRIANGLE_JSON.as_bytes());
        let g = load_graph_from_io(&compressed[..], GraphFormat::Auto).unwrap();
        check_triangle(&g);
    }

    #[test]
    fn osm_graph_auto() {
        let g = load_graph_from_io(GRID_XML, GraphFormat::Auto).unwrap();
        assert_eq!(g.len(), 6);
        assert_eq!(g.edge_count(), 12);

        let g = load_graph_from_io(&gzip(GRID_XML)[..], GraphFormat::Auto).unwrap();
        assert_eq!(g.len(), 6);

        let g = load_graph_from_io(&gzip(GRID_XML)[..], GraphFormat::OsmXmlGz).unwrap();
        assert_eq!(g.len(), 6);
    }

    #[test]
    fn json_graph_invalid_travel_time() {
        let data = r#"{
            "nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}, {"id": 2, "lat": 0.0, "lon": 0.1}],
            "edges": [{"from": 1, "to": 2, "travel_time": -1.0}]
        }"#;
        let err = load_graph_from_io(data.as_bytes(), GraphFormat::Json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidTravelTime { from: 1, to: 2, .. }
        ));
    }

    #[test]
    fn json_graph_unknown_node() {
        let data = r#"{
            "nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}],
            "edges": [{"from": 1, "to": 2, "travel_time": 1.0}]
        }"#;
        let err = load_graph_from_io(data.as_bytes(), GraphFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::UnknownNode { node: 2, .. }));

        let data = r#"{
            "nodes": [{"id": 1, "lat": 0.0, "lon": 0.0}],
            "edges": [{"from": 3, "to": 1, "travel_time": 1.0}]
        }"#;
        let err = load_graph_from_io(data.as_bytes(), GraphFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::UnknownNode { node: 3, .. }));
    }

    #[test]
    fn json_graph_malformed() {
        let err = load_graph_from_io(&b"{\"nodes\": ["[..], GraphFormat::Json).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn graph_from_file() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        f.write_all(TRIANGLE_JSON.as_bytes()).unwrap();
        f.flush().unwrap();

        let g = load_graph(f.path(), GraphFormat::Auto).unwrap();
        check_triangle(&g);
    }

    #[test]
    fn graph_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.osm");
        let err = load_graph(&path, GraphFormat::Auto).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with(&format!("{}: ", path.display())), "{}", message);
        assert!(matches!(err, LoadError::Open(p, _) if p == path));
    }
}
