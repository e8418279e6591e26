// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// A single document of per-street occurrence statistics, as exported from the document store.
///
/// Both fields are optional, as the store does not enforce a schema.
/// A street name which is not text is treated as missing. A count which is
/// present but can't be read as a non-negative integer is treated as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OccurrenceRecord {
    #[serde(rename = "LOGRADOURO", default, deserialize_with = "street_field")]
    pub street: Option<String>,

    #[serde(rename = "total_ocorrencias", default, deserialize_with = "count_field")]
    pub count: Option<u64>,
}

fn street_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn count_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(count_from_value(&Value::deserialize(deserializer)?))
}

/// Extended JSON wrappers used by document-store exports for typed numbers.
const NUMBER_WRAPPERS: [&str; 3] = ["$numberInt", "$numberLong", "$numberDouble"];

fn count_from_value(v: &Value) -> Option<u64> {
    match v {
        Value::Null => None,
        Value::Number(n) => Some(count_from_number(n)),
        Value::String(s) => Some(count_from_str(s)),
        Value::Object(o) => Some(
            NUMBER_WRAPPERS
                .iter()
                .find_map(|&k| o.get(k))
                .map_or(0, |inner| match inner {
                    Value::Number(n) => count_from_number(n),
                    Value::String(s) => count_from_str(s),
                    _ => 0,
                }),
        ),
        Value::Bool(_) | Value::Array(_) => Some(0),
    }
}

fn count_from_number(n: &Number) -> u64 {
    n.as_u64()
        .or_else(|| n.as_f64().and_then(count_from_float))
        .unwrap_or(0)
}

fn count_from_str(s: &str) -> u64 {
    let s = s.trim();
    s.parse::<u64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(count_from_float))
        .unwrap_or(0)
}

fn count_from_float(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 {
        Some(f as u64)
    } else {
        None
    }
}
