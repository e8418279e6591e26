// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Routing over [OpenStreetMap](https://www.openstreetmap.org/) data which avoids streets
//! with many recorded crime occurrences.
//!
//! A road network is loaded into a weighted directed multigraph whose edges carry
//! street names and travel times. Crime occurrence records are aggregated per street
//! into an [OccurrenceIndex]. For every request, streets with more occurrences than
//! the caller tolerates are removed from a copy of the graph, the fastest route is
//! searched over what remains, and the route is reported as a list of street segments.
//!
//! # Example
//!
//! ```no_run
//! use saferoute::{EngineOptions, RouteRequest, SafeRouter, Snapshot};
//! use saferoute::occurrence::{JsonRecordSource, load_index};
//!
//! let graph = saferoute::load_graph("path/to/city.osm", saferoute::GraphFormat::Auto)
//!     .expect("failed to load city.osm");
//! let index = load_index(&JsonRecordSource::new("path/to/occurrences.json"));
//!
//! let router = SafeRouter::new(Snapshot::new(graph, index), EngineOptions::default());
//! let response = router.calculate_route(&RouteRequest {
//!     origin_street: "Rua da Aurora".to_string(),
//!     destination_street: "Avenida Conde da Boa Vista".to_string(),
//!     max_crime_occurrences: 10,
//! });
//!
//! println!("{}", serde_json::to_string_pretty(&response).unwrap());
//! ```

mod assemble;
mod compress;
mod distance;
mod engine;
mod filter;
mod geocode;
mod graph;
mod kd;
mod load;
mod names;
mod normalize;
pub mod occurrence;
pub mod osm;
mod planner;
mod render;
mod search;

use serde::{Deserialize, Serialize};

pub use assemble::{assemble, route_street_names, AssembleError, StreetSegment, UNKNOWN_PERIOD};
pub use distance::earth_distance;
pub use engine::{
    EngineOptions, RouteError, RouteFound, RouteRequest, RouteResponse, SafeRouter, Snapshot,
};
pub use filter::{filter_graph, worst_occurrence, ExcludedEdge};
pub use geocode::{GeocodeError, Geocoder, StreetGeocoder};
pub use graph::Graph;
pub use kd::KDTree;
pub use load::{load_graph, load_graph_from_io, GraphFormat, LoadError};
pub use names::StreetNames;
pub use normalize::normalize;
pub use occurrence::OccurrenceIndex;
pub use planner::{plan, Endpoint, PlanError, Route};
pub use render::{
    ExcludedGeometry, GeoJsonRenderer, RenderError, RenderInput, Renderer,
    DEFAULT_RENDER_CEILING,
};
pub use search::{shortest_path, SearchError, DEFAULT_STEP_LIMIT};

/// A geographic position, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f32,
    pub lon: f32,
}

/// Represents an intersection (or any other vertex) of the [Graph].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub lat: f32,
    pub lon: f32,
}

impl Node {
    pub fn coord(&self) -> Coord {
        Coord {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Represents an outgoing (one-way) connection from a specific [Node].
///
/// There may be multiple edges between the same pair of nodes; they are told apart
/// by `key`. `travel_time` is expressed in seconds and must be finite and not negative.
///
/// Due to implementation details, `to` might not exist in the [Graph].
/// Users must silently ignore such edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub to: i64,
    pub key: u32,
    pub travel_time: f32,
    pub names: StreetNames,

    /// Shape of the street between its endpoints, empty if unknown.
    pub geometry: Vec<Coord>,
}

/// Identity of an [Edge] within a [Graph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId {
    pub from: i64,
    pub to: i64,
    pub key: u32,
}
