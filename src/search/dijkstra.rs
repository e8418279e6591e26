// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use crate::{Edge, Graph, SearchError};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f32,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower costs are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.cost.total_cmp(&self.cost)
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the fastest route between two nodes, using [Edge::travel_time] as the weight.
/// When several parallel edges connect two nodes, the fastest one is used.
///
/// Returns the sequence of visited node ids (including both endpoints),
/// or an empty vector if there is no route between the two nodes.
///
/// `step_limit` limits how many nodes may be expanded during the search
/// before returning [SearchError::StepLimitExceeded]. The recommended value is
/// [DEFAULT_STEP_LIMIT](crate::DEFAULT_STEP_LIMIT).
pub fn shortest_path(
    g: &Graph,
    from_id: i64,
    to_id: i64,
    step_limit: usize,
) -> Result<Vec<i64>, SearchError> {
    g.get_node(from_id)
        .ok_or(SearchError::InvalidReference(from_id))?;
    g.get_node(to_id)
        .ok_or(SearchError::InvalidReference(to_id))?;

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f32> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(QueueItem {
        at: from_id,
        cost: 0.0,
    });
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == to_id {
            return Ok(reconstruct_path(&came_from, to_id));
        }

        // The queue may hold stale items for nodes which were reached cheaper since.
        if item.cost > known_costs.get(&item.at).cloned().unwrap_or(f32::INFINITY) {
            continue;
        }

        steps += 1;
        if steps > step_limit {
            return Err(SearchError::StepLimitExceeded);
        }

        for &Edge {
            to: neighbor_id,
            travel_time,
            ..
        } in g.get_edges(item.at)
        {
            if g.get_node(neighbor_id).is_none() {
                continue;
            }

            let neighbor_cost = item.cost + travel_time;
            if neighbor_cost
                >= known_costs
                    .get(&neighbor_id)
                    .cloned()
                    .unwrap_or(f32::INFINITY)
            {
                continue;
            }

            came_from.insert(neighbor_id, item.at);
            known_costs.insert(neighbor_id, neighbor_cost);
            queue.push(QueueItem {
                at: neighbor_id,
                cost: neighbor_cost,
            });
        }
    }

    Ok(vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{edge, node};
    use crate::{StreetNames, DEFAULT_STEP_LIMIT};

    fn simple_graph() -> Graph {
        //   1 ──10── 2 ──10── 3
        //   │                 │
        //   5                 5
        //   │                 │
        //   4 ───────5─────── 5
        //
        // plus a parallel (slow) edge 1 → 2, and an isolated node 6.
        let mut g = Graph::new();
        for id in 1..=6 {
            g.set_node(node(id, 0.0, id as f32 * 0.01));
        }
        for (a, b, cost) in [(1, 2, 10.0), (2, 3, 10.0), (1, 4, 5.0), (4, 5, 5.0), (5, 3, 5.0)] {
            g.add_edge(a, edge(b, cost, StreetNames::None));
            g.add_edge(b, edge(a, cost, StreetNames::None));
        }
        g.add_edge(1, edge(2, 100.0, StreetNames::None));
        g
    }

    #[test]
    fn finds_fastest_route() {
        let g = simple_graph();
        assert_eq!(shortest_path(&g, 1, 3, DEFAULT_STEP_LIMIT), Ok(vec![1, 4, 5, 3]));
        assert_eq!(shortest_path(&g, 1, 2, DEFAULT_STEP_LIMIT), Ok(vec![1, 2]));
    }

    #[test]
    fn route_to_itself() {
        let g = simple_graph();
        assert_eq!(shortest_path(&g, 3, 3, DEFAULT_STEP_LIMIT), Ok(vec![3]));
    }

    #[test]
    fn no_route() {
        let g = simple_graph();
        assert_eq!(shortest_path(&g, 1, 6, DEFAULT_STEP_LIMIT), Ok(vec![]));
    }

    #[test]
    fn invalid_reference() {
        let g = simple_graph();
        assert_eq!(
            shortest_path(&g, 1, 42, DEFAULT_STEP_LIMIT),
            Err(SearchError::InvalidReference(42)),
        );
        assert_eq!(
            shortest_path(&g, 42, 1, DEFAULT_STEP_LIMIT),
            Err(SearchError::InvalidReference(42)),
        );
    }

    #[test]
    fn step_limit() {
        let g = simple_graph();
        assert_eq!(
            shortest_path(&g, 1, 3, 2),
            Err(SearchError::StepLimitExceeded),
        );
    }
}
