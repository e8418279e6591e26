// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use super::{OccurrenceIndex, OccurrenceRecord};
use crate::compress::decompressed;

/// Error conditions which may occur while fetching [OccurrenceRecords](OccurrenceRecord).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{path}: {1}", path = .0.display())]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed occurrence records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("occurrence records unavailable: {0}")]
    Unavailable(String),
}

/// Anything which can provide the raw occurrence records.
pub trait OccurrenceSource {
    fn fetch(&self) -> Result<Vec<OccurrenceRecord>, SourceError>;
}

impl OccurrenceSource for Vec<OccurrenceRecord> {
    fn fetch(&self) -> Result<Vec<OccurrenceRecord>, SourceError> {
        Ok(self.clone())
    }
}

/// Reads occurrence records from a document-store export on disk.
///
/// The export may either be a single JSON array, or a sequence of JSON documents
/// (e.g. JSON Lines). Gzip and bzip2 compressed files are decompressed transparently.
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parses records from any reader, with the same rules as [JsonRecordSource::fetch].
    pub fn read_from<R: Read>(reader: R) -> Result<Vec<OccurrenceRecord>, SourceError> {
        let mut data = Vec::default();
        decompressed(io::BufReader::new(reader))
            .and_then(|mut r| r.read_to_end(&mut data))
            .map_err(|e| SourceError::Io(PathBuf::default(), e))?;
        parse_records(&data)
    }
}

impl OccurrenceSource for JsonRecordSource {
    fn fetch(&self) -> Result<Vec<OccurrenceRecord>, SourceError> {
        let f = File::open(&self.path).map_err(|e| SourceError::Io(self.path.clone(), e))?;
        Self::read_from(f).map_err(|e| match e {
            SourceError::Io(_, e) => SourceError::Io(self.path.clone(), e),
            e => e,
        })
    }
}

fn parse_records(data: &[u8]) -> Result<Vec<OccurrenceRecord>, SourceError> {
    let first = data.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'[') {
        Ok(serde_json::from_slice(data)?)
    } else {
        Ok(serde_json::Deserializer::from_slice(data)
            .into_iter::<OccurrenceRecord>()
            .collect::<Result<Vec<_>, _>>()?)
    }
}

/// Builds an [OccurrenceIndex] from a source.
///
/// A failing or empty source doesn't fail the whole program: an empty index is
/// returned instead, and routes are simply not filtered.
pub fn load_index<S: OccurrenceSource + ?Sized>(source: &S) -> OccurrenceIndex {
    match source.fetch() {
        Ok(records) if records.is_empty() => {
            log::warn!("no occurrence records found - routes will not be filtered");
            OccurrenceIndex::default()
        }

        Ok(records) => {
            let total = records.len();
            let index = OccurrenceIndex::build(records);
            log::info!(
                "loaded {} occurrence records covering {} streets",
                total,
                index.len()
            );
            index
        }

        Err(e) => {
            log::warn!("{} - routes will not be filtered", e);
            OccurrenceIndex::default()
        }
    }
}
