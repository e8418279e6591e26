// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::{Graph, OccurrenceIndex, Route};

/// Placeholder for the time period of occurrence statistics,
/// which the occurrence records don't provide.
pub const UNKNOWN_PERIOD: &str = "N/A";

/// One stretch of a single street along a [Route].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreetSegment {
    pub name: String,
    pub occurrences: u64,
    pub period: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AssembleError {
    #[error("route uses a non-existing edge from {from} to {to}")]
    MissingEdge { from: i64, to: i64 },
}

/// Lists the street names along a [Route], in order of travel.
///
/// For every pair of consecutive nodes the fastest edge between them in `g` is used.
/// Edges with multiple names contribute all of them, unnamed edges contribute nothing.
/// Names are not deduplicated.
pub fn route_street_names(route: &Route, g: &Graph) -> Result<Vec<String>, AssembleError> {
    let mut names = Vec::default();
    for pair in route.nodes.windows(2) {
        let edge = g
            .cheapest_edge(pair[0], pair[1])
            .ok_or(AssembleError::MissingEdge {
                from: pair[0],
                to: pair[1],
            })?;
        names.extend(edge.names.iter().cloned());
    }
    Ok(names)
}

/// Converts a [Route] into a list of [StreetSegments](StreetSegment).
///
/// `g` should be the complete, unfiltered graph. Consecutive repetitions of the same
/// name are collapsed into a single segment; names are compared exactly as they are
/// written, so "Rua A" and "RUA A" make two segments.
pub fn assemble(
    route: &Route,
    g: &Graph,
    index: &OccurrenceIndex,
) -> Result<Vec<StreetSegment>, AssembleError> {
    let mut names = route_street_names(route, g)?;
    names.dedup();

    Ok(names
        .into_iter()
        .map(|name| StreetSegment {
            occurrences: index.lookup(&name),
            name,
            period: UNKNOWN_PERIOD.to_string(),
        })
        .collect())
}
