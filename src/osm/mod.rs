// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Loading of road networks from [OpenStreetMap](https://www.openstreetmap.org/) data.

mod profile;
mod reader;

pub use profile::{parse_maxspeed, Profile, Speed, DRIVE_PROFILE};
pub use reader::{
    add_features_from_buffer, add_features_from_file, add_features_from_io, Error, FileFormat,
    Options,
};

#[cfg(test)]
mod tests {
    use super::super::{Graph, StreetNames};
    use super::*;
    use std::io::Write;

    const DATA: &[u8] = include_bytes!("reader/test_fixtures/grid.osm");

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 0.05),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn load(data: &[u8], file_format: FileFormat) -> Graph {
        let mut g = Graph::default();
        let options = Options {
            profile: &DRIVE_PROFILE,
            file_format,
            bbox: [0.0; 4],
        };
        add_features_from_buffer(&mut g, &options, data).unwrap();
        g
    }

    fn check_grid_graph(g: &Graph) {
        // -1 ──Rua da Aurora── -2 ──Rua da Aurora── -3
        //  │                    │                    │
        // Rua São João     Avenida Norte;         (service,
        //  │               Rua & Travessa          no name)
        //  │                    │                    │
        // -4 ──Rua do Sol──→── -5 ──Rua do Sol──→── -6
        //                       ┆ (footway, not routable)
        //                      -7

        // -7 is only used by a footway, and must be removed
        assert_eq!(g.len(), 6);
        assert!(g.get_node(-7).is_none());

        // 4 two-way segments + 1 two-way service road + 2 one-way segments
        assert_eq!(g.edge_count(), 12);

        // One-way handling
        assert!(g.cheapest_edge(-4, -5).is_some());
        assert!(g.cheapest_edge(-5, -4).is_none());

        // Names
        assert_eq!(
            g.cheapest_edge(-1, -2).unwrap().names,
            StreetNames::from("Rua da Aurora"),
        );
        assert_eq!(
            g.cheapest_edge(-4, -1).unwrap().names,
            StreetNames::from("Rua São João"),
        );
        assert_eq!(
            g.cheapest_edge(-5, -2).unwrap().names,
            StreetNames::Many(vec!["Avenida Norte".to_string(), "Rua & Travessa".to_string()]),
        );
        assert_eq!(g.cheapest_edge(-3, -6).unwrap().names, StreetNames::None);

        // Travel times: ~110 m at 30 km/h (residential) and 60 km/h (maxspeed=60)
        let residential = g.cheapest_edge(-1, -2).unwrap().travel_time;
        let primary = g.cheapest_edge(-2, -5).unwrap().travel_time;
        assert_almost_eq!(residential, 13.21);
        assert_almost_eq!(primary, 6.67);

        // Geometry follows the direction of travel
        let e = g.cheapest_edge(-2, -1).unwrap();
        assert_eq!(e.geometry.len(), 2);
        assert_eq!(e.geometry[0], g.get_node(-2).unwrap().coord());
        assert_eq!(e.geometry[1], g.get_node(-1).unwrap().coord());
    }

    #[test]
    fn build_graph_xml() {
        check_grid_graph(&load(DATA, FileFormat::Xml));
    }

    #[test]
    fn build_graph_unknown_format() {
        check_grid_graph(&load(DATA, FileFormat::Unknown));
    }

    #[test]
    fn build_graph_gz() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        encoder.write_all(DATA).unwrap();
        let compressed = encoder.finish().unwrap();

        check_grid_graph(&load(&compressed, FileFormat::XmlGz));
        check_grid_graph(&load(&compressed, FileFormat::Unknown));
    }

    #[test]
    fn build_graph_bz2() {
        let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::fast());
        encoder.write_all(DATA).unwrap();
        let compressed = encoder.finish().unwrap();

        check_grid_graph(&load(&compressed, FileFormat::XmlBz2));
        check_grid_graph(&load(&compressed, FileFormat::Unknown));
    }

    #[test]
    fn build_graph_with_bbox() {
        let mut g = Graph::default();
        let options = Options {
            profile: &DRIVE_PROFILE,
            file_format: FileFormat::Xml,
            bbox: [-34.8805, -8.0605, -34.8775, -8.0595],
        };
        add_features_from_buffer(&mut g, &options, DATA).unwrap();

        // Only the northern row is left: -1, -2, -3 with Rua da Aurora in both directions
        assert_eq!(g.len(), 3);
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn build_graph_malformed() {
        let mut g = Graph::default();
        let options = Options {
            profile: &DRIVE_PROFILE,
            file_format: FileFormat::Xml,
            bbox: [0.0; 4],
        };
        let result = add_features_from_buffer(&mut g, &options, b"<osm><way id=\"1\"></node>");
        assert!(matches!(result, Err(Error::Xml(_))));
    }
}
