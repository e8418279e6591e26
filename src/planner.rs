// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{shortest_path, Graph, SearchError};

/// Ordered sequence of node ids, from the origin to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub nodes: Vec<i64>,
}

/// Identifies one end of a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Origin => write!(f, "origin"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Error conditions which may occur during [plan].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Both nodes exist, but the (filtered) graph has no path between them.
    #[error("no path from {from} to {to}")]
    NoPath { from: i64, to: i64 },

    /// A node passed to the planner doesn't exist in the graph.
    #[error("unknown node: {0}")]
    UnknownNode(i64),

    #[error("route search exceeded its step limit")]
    StepLimitExceeded,
}

impl From<SearchError> for PlanError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidReference(id) => Self::UnknownNode(id),
            SearchError::StepLimitExceeded => Self::StepLimitExceeded,
        }
    }
}

/// Finds the fastest [Route] between two nodes of an (already filtered) graph.
pub fn plan(
    g: &Graph,
    origin: i64,
    destination: i64,
    step_limit: usize,
) -> Result<Route, PlanError> {
    let nodes = shortest_path(g, origin, destination, step_limit)?;
    if nodes.is_empty() {
        Err(PlanError::NoPath {
            from: origin,
            to: destination,
        })
    } else {
        Ok(Route { nodes })
    }
}
