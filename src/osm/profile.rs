// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Kilometers in a statute mile.
const KM_PER_MILE: f32 = 1.609344;

/// Describes how to convert OSM data into a [Graph](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the routing profile,
    /// customary the most specific [access tag](https://wiki.openstreetmap.org/wiki/Key:access).
    pub name: &'a str,

    /// Array of tags which OSM ways can be used for routing, together with
    /// the speed assumed on ways without a usable `maxspeed` tag.
    ///
    /// A way is matched against all [Speed] objects in order, and once an exact
    /// key and value match is found the way is used for routing. Ways not matching
    /// any [Speed] are not routable.
    ///
    /// All speeds must be finite and greater than zero.
    pub speeds: &'a [Speed<'a>],

    /// Array of OSM [access tags](https://wiki.openstreetmap.org/wiki/Key:access#Land-based_transportation)
    /// (in order from least to most specific) to consider when checking for road prohibitions
    /// and mode-specific one-way restrictions.
    pub access: &'a [&'a str],

    /// Force no routing over [motorroad=yes](https://wiki.openstreetmap.org/wiki/Key:motorroad) ways.
    pub disallow_motorroad: bool,
}

/// Default travel speed for OSM ways with specific keys and values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed<'a> {
    /// Key of an OSM way for which this Speed applies, e.g. "highway".
    pub key: &'a str,

    /// Value under [Speed::key] of an OSM way for which this Speed applies,
    /// e.g. "primary" or "residential".
    pub value: &'a str,

    /// Speed in kilometers per hour.
    pub kmh: f32,
}

impl<'a> Profile<'a> {
    /// Returns the speed (in km/h) at which a way with given tags can be traversed,
    /// or `None` if the way is not routable.
    ///
    /// A valid `maxspeed` tag takes precedence over the default speed of the way type.
    pub fn way_speed(&self, tags: &HashMap<String, String>) -> Option<f32> {
        let default = self.default_speed(tags)?;
        if !self.is_allowed(tags) {
            return None;
        }

        Some(
            tags.get("maxspeed")
                .and_then(|v| parse_maxspeed(v))
                .unwrap_or(default),
        )
    }

    fn default_speed(&self, tags: &HashMap<String, String>) -> Option<f32> {
        self.speeds
            .iter()
            .find(|s| tags.get(s.key).map(|v| v.as_str()) == Some(s.value))
            .map(|s| s.kmh)
            .filter(|&kmh| kmh.is_finite() && kmh > 0.0)
    }

    /// Checks if the way is routable, by considering motor roads ([Profile::disallow_motorroad])
    /// and access tags ([Profile::access]).
    pub fn is_allowed(&self, tags: &HashMap<String, String>) -> bool {
        if self.disallow_motorroad && tags.get("motorroad").map(|v| v.as_str()) == Some("yes") {
            return false;
        }

        !matches!(
            self.access
                .iter()
                .rev()
                .find_map(|&mode| tags.get(mode).map(|v| v.as_str())),
            Some("no") | Some("private")
        )
    }

    /// Checks if a way is traversable forward (first return value) and
    /// backwards (second return value) by investigating mode-specific and generic one-way tags.
    ///
    /// Some ways (highway=motorway, highway=motorway_link, junction=roundabout and
    /// junction=circular) default to being one-way, except if overridden by specific tags.
    pub fn way_direction(&self, tags: &HashMap<String, String>) -> (bool, bool) {
        let implied_oneway = matches!(
            tags.get("highway").map(|s| s.as_str()),
            Some("motorway") | Some("motorway_link")
        ) || matches!(
            tags.get("junction").map(|s| s.as_str()),
            Some("roundabout") | Some("circular")
        );

        match self.active_oneway_value(tags) {
            "yes" | "true" | "1" => (true, false),
            "-1" | "reverse" => (false, true),
            "no" => (true, true),
            _ => (true, !implied_oneway),
        }
    }

    /// Returns the value of the most specific "oneway:MODE" tag (based on [Profile::access]),
    /// falling back to simply "oneway", and returning an empty string if no relevant tag was found.
    fn active_oneway_value<'t>(&self, tags: &'t HashMap<String, String>) -> &'t str {
        self.access
            .iter()
            .rev()
            .filter(|&&mode| mode != "access")
            .find_map(|&mode| tags.get(&format!("oneway:{}", mode)))
            .or_else(|| tags.get("oneway"))
            .map(|v| v.as_str())
            .unwrap_or("")
    }
}

/// Parses the value of a [maxspeed](https://wiki.openstreetmap.org/wiki/Key:maxspeed) tag
/// into kilometers per hour.
///
/// Plain numbers are km/h, numbers followed by "mph" are converted from miles per hour.
/// Multiple `;`-separated values are averaged. Symbolic values (like "RU:urban")
/// are ignored; returns `None` if no value could be understood.
pub fn parse_maxspeed(value: &str) -> Option<f32> {
    let speeds: Vec<f32> = value
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            let (number, factor) = match part.strip_suffix("mph") {
                Some(number) => (number.trim(), KM_PER_MILE),
                None => (part.strip_suffix("km/h").unwrap_or(part).trim(), 1.0),
            };
            number
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v * factor)
        })
        .collect();

    if speeds.is_empty() {
        None
    } else {
        Some(speeds.iter().sum::<f32>() / speeds.len() as f32)
    }
}

macro_rules! highway_speeds {
    ($( $value:literal : $kmh:literal ),+ $(,)?) => {
        &[ $( Speed { key: "highway", value: $value, kmh: $kmh } ),+ ]
    };
}

/// Routing [Profile] for cars over the drivable street network, with
/// typical urban speeds and appropriate
/// [access tags](https://wiki.openstreetmap.org/wiki/Key:access).
pub const DRIVE_PROFILE: Profile = Profile {
    name: "motorcar",
    speeds: highway_speeds! {
        "motorway": 100.0,
        "motorway_link": 60.0,
        "trunk": 80.0,
        "trunk_link": 50.0,
        "primary": 60.0,
        "primary_link": 40.0,
        "secondary": 50.0,
        "secondary_link": 40.0,
        "tertiary": 40.0,
        "tertiary_link": 30.0,
        "unclassified": 30.0,
        "residential": 30.0,
        "living_street": 10.0,
        "service": 20.0,
    },
    access: &["access", "vehicle", "motor_vehicle", "motorcar"],
    disallow_motorroad: false,
};
