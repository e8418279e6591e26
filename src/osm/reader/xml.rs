// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::str::from_utf8;

use quick_xml::events::{BytesStart, Event};

use super::model;
use crate::Node;

/// Parser is a trait for objects which can parse XML.
///
/// This trait only exists to fix the mismatch of
/// [quick_xml::Reader::read_event] when working on buffered data
/// and [quick_xml::Reader::read_event_into] when working on IO.
pub(super) trait Parser {
    fn read_event(&mut self) -> quick_xml::Result<Event<'_>>;
}

/// IoParser implements [Parser] over an [std::io::BufRead].
pub(super) struct IoParser<R: io::BufRead>(quick_xml::Reader<R>, Vec<u8>);

impl<R: io::BufRead> Parser for IoParser<R> {
    #[inline]
    fn read_event(&mut self) -> quick_xml::Result<Event<'_>> {
        self.1.clear();
        self.0.read_event_into(&mut self.1)
    }
}

/// BufParser implements [Parser] over a slice of bytes (`&[u8]`).
pub(super) struct BufParser<'a>(quick_xml::Reader<&'a [u8]>);

impl<'a> Parser for BufParser<'a> {
    #[inline]
    fn read_event(&mut self) -> quick_xml::Result<Event<'_>> {
        self.0.read_event()
    }
}

/// Reader streams osm [Features](model::Feature) from an
/// [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML) document.
pub(super) struct Reader<P: Parser> {
    parser: P,
    eof: bool,
}

impl<'a> Reader<BufParser<'a>> {
    pub(super) fn from_buffer(data: &'a [u8]) -> Self {
        Self {
            parser: BufParser(quick_xml::Reader::from_reader(data)),
            eof: false,
        }
    }
}

impl<R: io::BufRead> Reader<IoParser<R>> {
    pub(super) fn from_io(reader: R) -> Self {
        Self {
            parser: IoParser(quick_xml::Reader::from_reader(reader), Vec::default()),
            eof: false,
        }
    }
}

impl<P: Parser> Iterator for Reader<P> {
    type Item = Result<model::Feature, quick_xml::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        // Way currently being parsed; nodes are emitted as soon as they're read.
        let mut way: Option<model::Way> = None;

        while !self.eof {
            let event = match self.parser.read_event() {
                Ok(e) => e,
                Err(e) => return Some(Err(e)),
            };

            match event {
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"node" => {
                        if let Some(n) = parse_node(&e) {
                            return Some(Ok(model::Feature::Node(n)));
                        }
                    }
                    b"tag" => {
                        if let (Some(w), Some((k, v))) = (way.as_mut(), parse_tag(&e)) {
                            w.tags.insert(k, v);
                        }
                    }
                    b"nd" => {
                        if let (Some(w), Some(ref_)) = (way.as_mut(), parse_id(&e, b"ref")) {
                            w.nodes.push(ref_);
                        }
                    }
                    _ => {}
                },

                Event::Start(e) => match e.local_name().as_ref() {
                    // Tags of nodes are irrelevant, the node is complete once its start is read
                    b"node" => {
                        if let Some(n) = parse_node(&e) {
                            return Some(Ok(model::Feature::Node(n)));
                        }
                    }
                    b"way" => {
                        way = parse_id(&e, b"id").map(|id| model::Way {
                            id,
                            nodes: Vec::default(),
                            tags: HashMap::default(),
                        });
                    }
                    _ => {}
                },

                Event::End(e) => {
                    if e.local_name().as_ref() == b"way" {
                        if let Some(w) = way.take() {
                            return Some(Ok(model::Feature::Way(w)));
                        }
                    }
                }

                Event::Eof => self.eof = true,

                _ => {}
            }
        }

        way.map(|w| Ok(model::Feature::Way(w)))
    }
}

fn attr_str<'a>(value: &'a [u8], key: &[u8], element: &str) -> Option<&'a str> {
    match from_utf8(value) {
        Ok(s) => Some(s),
        Err(_) => {
            log::warn!(
                "{}: attribute {} is not valid UTF-8",
                element,
                String::from_utf8_lossy(key)
            );
            None
        }
    }
}

fn parse_id(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    let attr = e.try_get_attribute(key).ok().flatten()?;
    match attr_str(&attr.value, key, "element")?.parse::<i64>() {
        Ok(id) if id != 0 => Some(id),
        _ => {
            log::warn!("invalid {} attribute: {:?}", String::from_utf8_lossy(key), attr.value);
            None
        }
    }
}

fn parse_node(e: &BytesStart<'_>) -> Option<Node> {
    let mut id: i64 = 0;
    let mut lat = f32::NAN;
    let mut lon = f32::NAN;

    for attr in e.attributes().flatten() {
        let Some(value) = attr_str(&attr.value, attr.key.as_ref(), "node") else {
            continue;
        };
        match attr.key.as_ref() {
            b"id" => id = value.parse().unwrap_or(0),
            b"lat" => lat = value.parse().unwrap_or(f32::NAN),
            b"lon" => lon = value.parse().unwrap_or(f32::NAN),
            _ => {}
        }
    }

    if id != 0 && lat.is_finite() && lon.is_finite() {
        Some(Node { id, lat, lon })
    } else {
        log::warn!("skipping node {} with invalid id or position", id);
        None
    }
}

fn parse_tag(e: &BytesStart<'_>) -> Option<(String, String)> {
    let mut k = None;
    let mut v = None;

    for attr in e.attributes().flatten() {
        let value = attr
            .unescape_value()
            .map(|s| s.into_owned())
            .ok();
        match attr.key.as_ref() {
            b"k" => k = value,
            b"v" => v = value,
            _ => {}
        }
    }

    k.map(|k| (k, v.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::model::{Feature, Way};
    use super::*;

    const GRID_XML: &[u8] = include_bytes!("test_fixtures/grid.osm");

    fn collect_all<I: Iterator<Item = Result<Feature, quick_xml::Error>>>(
        features: I,
    ) -> Result<(Vec<Node>, Vec<Way>), quick_xml::Error> {
        let mut nodes = Vec::default();
        let mut ways = Vec::default();

        for f in features {
            match f? {
                Feature::Node(n) => nodes.push(n),
                Feature::Way(w) => ways.push(w),
            }
        }

        Ok((nodes, ways))
    }

    fn check_grid<I: Iterator<Item = Result<Feature, quick_xml::Error>>>(
        features: I,
    ) -> Result<(), quick_xml::Error> {
        let (nodes, ways) = collect_all(features)?;

        assert_eq!(nodes.len(), 7);
        assert_eq!(
            nodes[0],
            Node {
                id: -1,
                lat: -8.0600,
                lon: -34.8800,
            },
        );

        assert_eq!(ways.len(), 6);
        assert_eq!(ways[0].id, -100);
        assert_eq!(ways[0].nodes, [-1, -2, -3]);
        assert_eq!(ways[0].tags.get("name").map(|s| s.as_str()), Some("Rua da Aurora"));
        assert_eq!(ways[2].tags.get("name").map(|s| s.as_str()), Some("Rua São João"));
        assert_eq!(
            ways[3].tags.get("name").map(|s| s.as_str()),
            Some("Avenida Norte; Rua & Travessa"),
        );
        Ok(())
    }

    #[test]
    fn parse_from_buf() -> Result<(), quick_xml::Error> {
        check_grid(Reader::from_buffer(GRID_XML))
    }

    #[test]
    fn parse_from_io() -> Result<(), quick_xml::Error> {
        check_grid(Reader::from_io(io::Cursor::new(GRID_XML)))
    }

    #[test]
    fn malformed_xml() {
        let data = b"<osm><way id=\"1\"><nd ref=\"1\"/></node></osm>";
        let result = collect_all(Reader::from_buffer(data));
        assert!(result.is_err());
    }
}
