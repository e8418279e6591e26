// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::{earth_distance, Edge, Graph, Node, StreetNames};

use super::{model, Options};

const SECONDS_PER_HOUR: f32 = 3600.0;

/// Helper object used for storing state related to converting [OSM features](super::model::Feature)
/// into a [Graph].
pub(super) struct GraphBuilder<'a> {
    g: &'a mut Graph,
    options: &'a Options<'a>,
    unused_nodes: HashSet<i64>,
    ignore_bbox: bool,
}

impl<'a> GraphBuilder<'a> {
    pub(super) fn new(g: &'a mut Graph, options: &'a Options<'a>) -> Self {
        let all_zero = options.bbox.iter().all(|&x| x == 0.0);
        let non_finite = options.bbox.iter().any(|x| !x.is_finite());
        if non_finite {
            log::warn!("ignoring invalid bounding box {:?}", options.bbox);
        }

        Self {
            g,
            options,
            unused_nodes: HashSet::default(),
            ignore_bbox: all_zero || non_finite,
        }
    }

    /// Add all features from the provided iterator, then remove nodes
    /// which are not part of any routable way.
    pub(super) fn add_features<E, I: Iterator<Item = Result<model::Feature, E>>>(
        &mut self,
        features: I,
    ) -> Result<(), E> {
        log::debug!("building graph with the {} profile", self.options.profile.name);
        for f in features {
            match f? {
                model::Feature::Node(n) => self.add_node(n),
                model::Feature::Way(w) => self.add_way(w),
            }
        }
        self.cleanup();
        Ok(())
    }

    fn cleanup(&mut self) {
        log::debug!("removing {} nodes outside of routable ways", self.unused_nodes.len());
        for id in self.unused_nodes.drain() {
            self.g.delete_node(id);
        }
    }

    fn add_node(&mut self, n: Node) {
        if self.is_in_bbox(n.lat, n.lon) {
            self.g.set_node(n);
            self.unused_nodes.insert(n.id);
        }
    }

    fn is_in_bbox(&self, lat: f32, lon: f32) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    fn add_way(&mut self, w: model::Way) {
        let Some(speed) = self.options.profile.way_speed(&w.tags) else {
            return;
        };

        let nodes = self.get_way_nodes(&w);
        if nodes.len() < 2 {
            log::debug!("way {} has less than 2 known nodes - skipping", w.id);
            return;
        }

        let (forward, backward) = self.options.profile.way_direction(&w.tags);
        let names = w
            .tags
            .get("name")
            .map(|v| StreetNames::from_tag(v))
            .unwrap_or_default();

        for pair in nodes.windows(2) {
            self.create_edges(pair[0], pair[1], speed, &names, forward, backward);
        }

        for node in &nodes {
            self.unused_nodes.remove(&node.id);
        }
    }

    /// Returns the nodes of a way which exist in the graph.
    fn get_way_nodes(&self, w: &model::Way) -> Vec<Node> {
        w.nodes
            .iter()
            .filter_map(|&node_id| self.g.get_node(node_id))
            .collect()
    }

    fn create_edges(
        &mut self,
        left: Node,
        right: Node,
        speed: f32,
        names: &StreetNames,
        forward: bool,
        backward: bool,
    ) {
        debug_assert!(speed.is_finite() && speed > 0.0);

        let length = earth_distance(left.lat, left.lon, right.lat, right.lon);
        let travel_time = length / speed * SECONDS_PER_HOUR;

        if forward {
            self.g.add_edge(
                left.id,
                Edge {
                    to: right.id,
                    key: 0,
                    travel_time,
                    names: names.clone(),
                    geometry: vec![left.coord(), right.coord()],
                },
            );
        }
        if backward {
            self.g.add_edge(
                right.id,
                Edge {
                    to: left.id,
                    key: 0,
                    travel_time,
                    names: names.clone(),
                    geometry: vec![right.coord(), left.coord()],
                },
            );
        }
    }
}
