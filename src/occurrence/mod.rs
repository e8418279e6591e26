// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Per-street crime occurrence counts.

mod record;
mod source;

use std::collections::HashMap;

use crate::normalize;

pub use record::OccurrenceRecord;
pub use source::{load_index, JsonRecordSource, OccurrenceSource, SourceError};

/// Maps [normalized](crate::normalize) street names to the number of recorded occurrences.
///
/// Streets without an entry have no recorded occurrences. The index is never
/// modified after it was built; refreshing the data means building a new index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceIndex(HashMap<String, u64>);

impl OccurrenceIndex {
    /// Builds an index from raw records.
    ///
    /// Records without a street name or without a count are dropped. If multiple records
    /// normalize to the same street name, the last one wins.
    pub fn build<I: IntoIterator<Item = OccurrenceRecord>>(records: I) -> Self {
        let mut counts = HashMap::default();
        let mut dropped: usize = 0;

        for record in records {
            match record {
                OccurrenceRecord {
                    street: Some(street),
                    count: Some(count),
                } => {
                    counts.insert(normalize(&street), count);
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            log::warn!("dropped {} occurrence records without a street name or count", dropped);
        }

        Self(counts)
    }

    /// Returns the number of occurrences recorded for a street, or 0 if there are none.
    /// The name is normalized before the lookup.
    pub fn lookup(&self, name: &str) -> u64 {
        self.0.get(&normalize(name)).cloned().unwrap_or(0)
    }

    /// Returns the number of streets with recorded occurrences.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<OccurrenceRecord> for OccurrenceIndex {
    fn from_iter<I: IntoIterator<Item = OccurrenceRecord>>(records: I) -> Self {
        Self::build(records)
    }
}
