// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Raw deflate (no zlib/gzip framing) at a fixed compression level.
//!
//! The empty sequence maps to itself in both directions, so an empty payload
//! never grows into a deflate stream.

use core::fmt;
use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::outcome::{Event, Outcome, Severity};

const SOURCE: &str = "Compression";

/// Compression level used for every record. Payloads are small, so the
/// slowest level costs nothing noticeable.
const LEVEL: u32 = 9;

/// Upper bound on inflated output, guarding against decompression bombs.
pub const MAX_INFLATED_LEN: usize = 16 * 1024 * 1024;

/// Failures of [`decompress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionEvent {
    /// The deflate stream is malformed; carries the decoder's diagnostic.
    InflateFailed(String),
    /// The inflated output exceeds [`MAX_INFLATED_LEN`].
    TooLarge,
}

impl CompressionEvent {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for CompressionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InflateFailed(reason) => write!(f, "Inflating the data failed: {reason}."),
            Self::TooLarge => write!(
                f,
                "Inflating the data exceeded the limit of {MAX_INFLATED_LEN} bytes."
            ),
        }
    }
}

impl From<CompressionEvent> for Event {
    fn from(event: CompressionEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}

/// Deflate `data`.
pub fn compress(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(data.len() / 2), Compression::new(LEVEL));
    // Writing into a Vec cannot fail.
    encoder.write_all(data).expect("deflate into memory should not fail");
    encoder.finish().expect("deflate into memory should not fail")
}

/// Inflate `data`, reporting malformed input as an Error.
pub fn decompress(data: &[u8]) -> Outcome<Vec<u8>> {
    if data.is_empty() {
        return Outcome::success(Vec::new());
    }
    let decoder = DeflateDecoder::new(data);
    let mut output = Vec::new();
    if let Err(e) = decoder
        .take(MAX_INFLATED_LEN as u64 + 1)
        .read_to_end(&mut output)
    {
        return Outcome::error(CompressionEvent::InflateFailed(e.to_string()));
    }
    if output.len() > MAX_INFLATED_LEN {
        return Outcome::error(CompressionEvent::TooLarge);
    }
    Outcome::success(output)
}
