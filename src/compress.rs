// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io::{self, BufRead};

/// Compression of an input stream, as recognized from its first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Compression {
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    pub(crate) fn detect(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            Self::Gzip
        } else if head.starts_with(b"BZh") {
            Self::Bzip2
        } else {
            Self::None
        }
    }
}

/// Wraps a reader in a decompressor chosen by peeking at the magic bytes of the stream.
pub(crate) fn decompressed<'a, R: BufRead + 'a>(
    mut reader: R,
) -> io::Result<Box<dyn BufRead + 'a>> {
    let compression = Compression::detect(reader.fill_buf()?);
    Ok(match compression {
        Compression::None => Box::new(reader),
        Compression::Gzip => {
            let d = flate2::bufread::MultiGzDecoder::new(reader);
            Box::new(io::BufReader::new(d))
        }
        Compression::Bzip2 => {
            let d = bzip2::bufread::MultiBzDecoder::new(reader);
            Box::new(io::BufReader::new(d))
        }
    })
}
