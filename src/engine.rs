// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::occurrence::{load_index, OccurrenceSource};
use crate::{
    assemble, filter_graph, plan, Endpoint, Geocoder, Graph, OccurrenceIndex, PlanError,
    RenderInput, Renderer, StreetGeocoder, StreetSegment, DEFAULT_RENDER_CEILING,
    DEFAULT_STEP_LIMIT,
};

/// Immutable state shared by all requests: the road network, the occurrence index
/// and a geocoder over the road network.
pub struct Snapshot {
    pub graph: Arc<Graph>,
    pub index: Arc<OccurrenceIndex>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl Snapshot {
    /// Creates a snapshot with a [StreetGeocoder] built over the graph.
    pub fn new(graph: Graph, index: OccurrenceIndex) -> Self {
        let geocoder = Arc::new(StreetGeocoder::new(&graph));
        Self {
            graph: Arc::new(graph),
            index: Arc::new(index),
            geocoder,
        }
    }

    /// Creates a snapshot sharing everything with this one, except for the occurrence index.
    pub fn with_index(&self, index: OccurrenceIndex) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            index: Arc::new(index),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

/// Tunables of the [SafeRouter].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Maximum number of node expansions of a single route search.
    pub step_limit: usize,

    /// Excluded edges are only passed to the renderer individually
    /// if there are fewer of them than this value.
    pub render_ceiling: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            render_ceiling: DEFAULT_RENDER_CEILING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin_street: String,
    pub destination_street: String,
    pub max_crime_occurrences: u64,
}

/// Successfully computed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteFound {
    pub route_found: bool,
    pub route_street_names: Vec<String>,
    pub route_street_info: Vec<StreetSegment>,
    pub message: String,

    /// Number of edges avoided due to the occurrence limit.
    pub excluded_edges: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_map: Option<Value>,
}

/// Reasons for not returning a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("could not find the {endpoint} street: '{street}'. Check the spelling.")]
    UnresolvedEndpoint { endpoint: Endpoint, street: String },

    #[error("no route found within the limit of {max_occurrences} occurrences. Try raising the limit.")]
    NoFeasiblePath { max_occurrences: u64 },

    #[error("unexpected error: {0}")]
    Internal(String),
}

/// Response to a [RouteRequest], serialized into one of the following JSON shapes:
/// - `{"route_found": true, "route_street_names": [...], "route_street_info": [...], ...}`,
/// - `{"route_found": false, "message": "..."}`,
/// - `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouteResponse {
    Found(RouteFound),
    NotFound { route_found: bool, message: String },
    Error { error: String },
}

impl RouteResponse {
    pub fn error<S: ToString>(message: S) -> Self {
        Self::Error {
            error: message.to_string(),
        }
    }
}

impl From<Result<RouteFound, RouteError>> for RouteResponse {
    fn from(r: Result<RouteFound, RouteError>) -> Self {
        match r {
            Ok(found) => Self::Found(found),
            Err(e @ RouteError::NoFeasiblePath { .. }) => Self::NotFound {
                route_found: false,
                message: e.to_string(),
            },
            Err(e) => Self::error(e),
        }
    }
}

/// Computes routes avoiding streets with too many crime occurrences.
///
/// The router can be shared between threads. Every request works on its own
/// copy of the road network, and the shared [Snapshot] may be replaced at any time
/// without disturbing requests in flight.
pub struct SafeRouter {
    snapshot: RwLock<Arc<Snapshot>>,
    renderer: Option<Box<dyn Renderer>>,
    options: EngineOptions,
}

impl SafeRouter {
    pub fn new(snapshot: Snapshot, options: EngineOptions) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(snapshot)),
            renderer: None,
            options,
        }
    }

    /// Attaches a [Renderer] whose output is included in successful responses.
    pub fn with_renderer<R: Renderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Returns the currently used [Snapshot].
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.snapshot.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swaps the shared state. Requests in flight finish with the previous snapshot.
    pub fn replace_snapshot(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    /// Rebuilds the occurrence index from a source and swaps it in,
    /// keeping the current road network.
    pub fn reload_occurrences<S: OccurrenceSource + ?Sized>(&self, source: &S) {
        let index = load_index(source);
        let snapshot = self.snapshot().with_index(index);
        log::info!(
            "occurrence index refreshed, {} streets with recorded occurrences",
            snapshot.index.len()
        );
        self.replace_snapshot(snapshot);
    }

    /// Computes a route and converts the outcome into a [RouteResponse].
    ///
    /// This function never panics; unexpected failures are logged and reported
    /// as a generic error response.
    pub fn calculate_route(&self, request: &RouteRequest) -> RouteResponse {
        log::debug!(
            "route request from '{}' to '{}' with a limit of {} occurrences",
            request.origin_street,
            request.destination_street,
            request.max_crime_occurrences
        );

        let outcome = catch_unwind(AssertUnwindSafe(|| self.try_calculate_route(request)))
            .unwrap_or_else(|panic| {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "panic".to_string());
                Err(RouteError::Internal(reason))
            });

        if let Err(RouteError::Internal(ref reason)) = outcome {
            log::error!(
                "failed to compute a route from '{}' to '{}': {}",
                request.origin_street,
                request.destination_street,
                reason
            );
        }

        outcome.into()
    }

    /// Computes a route, returning the typed outcome.
    pub fn try_calculate_route(&self, request: &RouteRequest) -> Result<RouteFound, RouteError> {
        let snapshot = self.snapshot();

        let origin = resolve(&*snapshot.geocoder, Endpoint::Origin, &request.origin_street)?;
        let destination = resolve(
            &*snapshot.geocoder,
            Endpoint::Destination,
            &request.destination_street,
        )?;

        let (filtered, excluded) =
            filter_graph(&snapshot.graph, &snapshot.index, request.max_crime_occurrences);

        let route = plan(&filtered, origin, destination, self.options.step_limit).map_err(
            |e| match e {
                PlanError::NoPath { .. } => RouteError::NoFeasiblePath {
                    max_occurrences: request.max_crime_occurrences,
                },
                e => RouteError::Internal(e.to_string()),
            },
        )?;

        let segments = assemble(&route, &snapshot.graph, &snapshot.index)
            .map_err(|e| RouteError::Internal(e.to_string()))?;

        let route_map = self.renderer.as_ref().and_then(|renderer| {
            let input =
                RenderInput::new(&snapshot.graph, &route, &excluded, self.options.render_ceiling)?;
            renderer
                .render(&input)
                .map_err(|e| log::warn!("{}", e))
                .ok()
        });

        Ok(RouteFound {
            route_found: true,
            route_street_names: segments.iter().map(|s| s.name.clone()).collect(),
            route_street_info: segments,
            message: "Safe route found!".to_string(),
            excluded_edges: excluded.len(),
            route_map,
        })
    }
}

fn resolve(geocoder: &dyn Geocoder, endpoint: Endpoint, street: &str) -> Result<i64, RouteError> {
    let unresolved = || RouteError::UnresolvedEndpoint {
        endpoint,
        street: street.to_string(),
    };

    match geocoder.resolve(street) {
        Ok(Some(node_id)) => Ok(node_id),
        Ok(None) => Err(unresolved()),
        Err(e) => {
            log::warn!("failed to resolve the {} street '{}': {}", endpoint, street, e);
            Err(unresolved())
        }
    }
}
