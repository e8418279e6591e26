// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Street names attached to an [Edge](crate::Edge).
///
/// Contiguous ways are sometimes merged into a single edge, which then carries
/// every label of the merged ways, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StreetNames {
    #[default]
    None,
    Single(String),
    Many(Vec<String>),
}

impl StreetNames {
    /// Parses the value of an OSM `name` tag, where multiple names are separated by `;`.
    pub fn from_tag(value: &str) -> Self {
        value
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>()
            .into()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Single(_) => 1,
            Self::Many(names) => names.len(),
        }
    }

    /// Returns an iterator over all names, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        match self {
            Self::None => <&[String]>::default().iter(),
            Self::Single(name) => std::slice::from_ref(name).iter(),
            Self::Many(names) => names.iter(),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }
}

impl From<Vec<String>> for StreetNames {
    fn from(mut names: Vec<String>) -> Self {
        match names.len() {
            0 => Self::None,
            1 => Self::Single(names.swap_remove(0)),
            _ => Self::Many(names),
        }
    }
}

impl From<&str> for StreetNames {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl<'a> IntoIterator for &'a StreetNames {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNames {
    Single(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for StreetNames {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawNames>::deserialize(deserializer)? {
            None => Self::None,
            Some(RawNames::Single(name)) => Self::Single(name),
            Some(RawNames::Many(names)) => names.into(),
        })
    }
}

impl Serialize for StreetNames {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Single(name) => serializer.serialize_str(name),
            Self::Many(names) => names.serialize(serializer),
        }
    }
}
