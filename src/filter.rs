// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::{Edge, EdgeId, Graph, OccurrenceIndex};

/// Describes an [Edge] removed by [filter_graph].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedEdge {
    pub id: EdgeId,
    pub names: Vec<String>,

    /// Highest occurrence count among all names of the edge.
    pub max_occurrences: u64,
}

/// Returns the highest occurrence count among all names of an [Edge],
/// or `None` if the edge has no names.
pub fn worst_occurrence(edge: &Edge, index: &OccurrenceIndex) -> Option<u64> {
    edge.names.iter().map(|name| index.lookup(name)).max()
}

/// Creates a copy of the graph without the edges which have at least one name
/// with more than `max_occurrences` recorded occurrences.
///
/// A single name over the limit disqualifies the whole edge, even if the edge
/// has other names within the limit. Edges without names are always kept,
/// and so are all nodes.
///
/// Returns the filtered graph and the list of removed edges, in graph order.
pub fn filter_graph(
    g: &Graph,
    index: &OccurrenceIndex,
    max_occurrences: u64,
) -> (Graph, Vec<ExcludedEdge>) {
    let mut filtered = g.clone();
    let mut excluded = Vec::default();

    filtered.retain_edges(|from_id, edge| match worst_occurrence(edge, index) {
        Some(worst) if worst > max_occurrences => {
            excluded.push(ExcludedEdge {
                id: EdgeId {
                    from: from_id,
                    to: edge.to,
                    key: edge.key,
                },
                names: edge.names.to_vec(),
                max_occurrences: worst,
            });
            false
        }
        _ => true,
    });

    if excluded.is_empty() {
        log::debug!("no edges exceed the limit of {} occurrences", max_occurrences);
    } else {
        log::debug!(
            "removed {} edges exceeding the limit of {} occurrences",
            excluded.len(),
            max_occurrences
        );
    }

    (filtered, excluded)
}
