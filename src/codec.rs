//! Codec detection by magic bytes and transparent decoding of log files.
//!
//! Detection never trusts the file extension: rotation tooling may compress a
//! file in place or hand us a `.1` sibling that is actually gzip. The header is
//! re-read on every open.

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{MonitorError, Result};

/// Encoding of a log file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Uncompressed,
    Gzip,
    Bzip2,
}

/// Magic-byte prefixes. Longest prefix wins; anything else is uncompressed.
const MAGIC: &[(&[u8], Codec)] = &[(b"\x1f\x8b\x08", Codec::Gzip), (b"BZh", Codec::Bzip2)];

type DecoderCtor = fn(File) -> Box<dyn Read>;

/// Decoding-stream constructor per compressed codec.
const DECODERS: &[(Codec, DecoderCtor)] = &[
    (Codec::Gzip, gzip_stream),
    (Codec::Bzip2, bzip2_stream),
];

fn gzip_stream(file: File) -> Box<dyn Read> {
    Box::new(MultiGzDecoder::new(file))
}

fn bzip2_stream(file: File) -> Box<dyn Read> {
    Box::new(MultiBzDecoder::new(file))
}

fn header_len() -> usize {
    MAGIC.iter().map(|(magic, _)| magic.len()).max().unwrap_or(0)
}

impl Codec {
    /// Classify a header by longest matching magic prefix.
    pub fn from_header(header: &[u8]) -> Codec {
        MAGIC
            .iter()
            .filter(|(magic, _)| header.starts_with(magic))
            .max_by_key(|(magic, _)| magic.len())
            .map(|(_, codec)| *codec)
            .unwrap_or(Codec::Uncompressed)
    }

    fn decoder(self, file: File) -> Box<dyn Read> {
        match DECODERS.iter().find(|(codec, _)| *codec == self) {
            Some((_, ctor)) => ctor(file),
            None => Box::new(file),
        }
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Codec::Uncompressed => write!(f, "uncompressed"),
            Codec::Gzip => write!(f, "gzip"),
            Codec::Bzip2 => write!(f, "bzip2"),
        }
    }
}

/// Read the leading bytes of `path` and classify its encoding.
pub fn detect(path: &Path) -> Result<Codec> {
    let file = File::open(path).map_err(|e| MonitorError::missing_log(path, e))?;
    let mut header = Vec::with_capacity(header_len());
    file.take(header_len() as u64)
        .read_to_end(&mut header)
        .map_err(|e| MonitorError::missing_log(path, e))?;
    Ok(Codec::from_header(&header))
}

/// Open `path` as a decoded line stream positioned at `offset` decoded bytes.
///
/// Uncompressed files are seeked directly; compressed streams are decoded and
/// the first `offset` bytes discarded.
pub fn open_at(path: &Path, offset: u64) -> Result<Box<dyn BufRead>> {
    let codec = detect(path)?;
    let mut file = File::open(path).map_err(|e| MonitorError::missing_log(path, e))?;
    tracing::debug!(path = %path.display(), %codec, offset, "opening log");

    if codec == Codec::Uncompressed {
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| MonitorError::missing_log(path, e))?;
        return Ok(Box::new(BufReader::new(file)));
    }

    let mut reader = BufReader::new(codec.decoder(file));
    io::copy(&mut (&mut reader).take(offset), &mut io::sink())
        .map_err(|e| MonitorError::missing_log(path, e))?;
    Ok(Box::new(reader))
}
