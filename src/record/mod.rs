// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Self-describing binary envelope around a watermark payload.
//!
//! Every record starts with a one-byte tag that names its variant. The
//! variant decides which metadata follows:
//!
//! ```text
//! [1 byte ] tag
//! [4 bytes] content length (u32 LE)            -- sized variants only
//! [4 bytes] CRC-32 of the uncompressed payload -- checksummed variants only
//! [N bytes] content (raw deflate of the payload for compressed variants)
//! ```
//!
//! Tag bits: `0x01` sized, `0x02` checksummed, `0x40` compressed.
//!
//! A decoder looks the tag up in a [`Registry`], so a record can be
//! recognised and verified without knowing what the payload means.

mod error;
mod frequency;

pub use error::RecordEvent;
pub use frequency::most_frequent;

use std::collections::BTreeMap;

use crate::binary::{self, ByteReader};
use crate::outcome::{Outcome, Status};
use crate::watermark::{self, Watermark};

/// Tag bit marking a sized variant.
pub const TAG_SIZED: u8 = 0x01;
/// Tag bit marking a checksummed variant.
pub const TAG_CHECKSUMMED: u8 = 0x02;
/// Tag bit marking a compressed variant.
pub const TAG_COMPRESSED: u8 = 0x40;

/// Byte length of the size and checksum fields.
const FIELD_LEN: usize = 4;

/// Description of one record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    tag: u8,
    name: &'static str,
    sized: bool,
    checksummed: bool,
    compressed: bool,
}

impl Variant {
    pub const RAW: Variant = Variant::new(0x00, "Raw", false, false, false);
    pub const SIZED: Variant = Variant::new(TAG_SIZED, "Sized", true, false, false);
    pub const CRC32: Variant = Variant::new(TAG_CHECKSUMMED, "CRC32", false, true, false);
    pub const SIZED_CRC32: Variant =
        Variant::new(TAG_SIZED | TAG_CHECKSUMMED, "SizedCRC32", true, true, false);
    pub const COMPRESSED: Variant = Variant::new(TAG_COMPRESSED, "Compressed", false, false, true);
    pub const COMPRESSED_SIZED: Variant =
        Variant::new(TAG_COMPRESSED | TAG_SIZED, "CompressedSized", true, false, true);
    pub const COMPRESSED_CRC32: Variant =
        Variant::new(TAG_COMPRESSED | TAG_CHECKSUMMED, "CompressedCRC32", false, true, true);
    pub const COMPRESSED_SIZED_CRC32: Variant = Variant::new(
        TAG_COMPRESSED | TAG_SIZED | TAG_CHECKSUMMED,
        "CompressedSizedCRC32",
        true,
        true,
        true,
    );

    /// Define a variant. Extension variants must pick a tag no registered
    /// variant uses.
    pub const fn new(tag: u8, name: &'static str, sized: bool, checksummed: bool, compressed: bool) -> Self {
        Self { tag, name, sized, checksummed, compressed }
    }

    pub const fn tag(&self) -> u8 {
        self.tag
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn is_sized(&self) -> bool {
        self.sized
    }

    pub const fn is_checksummed(&self) -> bool {
        self.checksummed
    }

    pub const fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Bytes before the content: tag plus optional size and checksum.
    pub const fn header_len(&self) -> usize {
        1 + if self.sized { FIELD_LEN } else { 0 } + if self.checksummed { FIELD_LEN } else { 0 }
    }

    /// Parse and verify `bytes` as this variant.
    pub fn decode(&self, bytes: &[u8]) -> Outcome<Record> {
        let header = match self.read_header(bytes) {
            Ok(header) => header,
            Err(event) => return Outcome::error(event),
        };
        let content = &bytes[self.header_len()..];
        if let Err(event) = header.check_size(content) {
            return Outcome::error(event);
        }

        let payload = if self.compressed {
            let (status, inflated) = binary::decompress(content).into_parts();
            match inflated {
                Some(inflated) if !status.is_error() => inflated,
                _ => return status.into_empty(),
            }
        } else {
            content.to_vec()
        };
        if let Err(event) = header.check_checksum(&payload) {
            return Outcome::error(event);
        }

        tracing::debug!(variant = self.name, len = bytes.len(), "decoded record");
        Outcome::success(Record { variant: *self, bytes: bytes.to_vec(), payload })
    }

    fn read_header(&self, bytes: &[u8]) -> Result<Header, RecordEvent> {
        let short = || RecordEvent::NotEnoughBytes {
            variant: self.name,
            expected: self.header_len(),
            actual: bytes.len(),
        };
        let mut reader = ByteReader::new(bytes);
        let tag = reader.read_u8().ok_or_else(short)?;
        if tag != self.tag {
            return Err(RecordEvent::TagMismatch { variant: self.name, expected: self.tag, found: tag });
        }
        let size = if self.sized { Some(reader.read_u32_le().ok_or_else(short)?) } else { None };
        let checksum = if self.checksummed { Some(reader.read_u32_le().ok_or_else(short)?) } else { None };
        Ok(Header { size, checksum })
    }
}

/// The built-in variants.
pub const BUILTIN_VARIANTS: [Variant; 8] = [
    Variant::RAW,
    Variant::SIZED,
    Variant::CRC32,
    Variant::SIZED_CRC32,
    Variant::COMPRESSED,
    Variant::COMPRESSED_SIZED,
    Variant::COMPRESSED_CRC32,
    Variant::COMPRESSED_SIZED_CRC32,
];

const fn tags_unique(variants: &[Variant]) -> bool {
    let mut i = 0;
    while i < variants.len() {
        let mut j = i + 1;
        while j < variants.len() {
            if variants[i].tag == variants[j].tag {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const _: () = assert!(tags_unique(&BUILTIN_VARIANTS), "record variant tags must be unique");

/// Metadata read from a record header.
struct Header {
    size: Option<u32>,
    checksum: Option<u32>,
}

impl Header {
    fn check_size(&self, content: &[u8]) -> Result<(), RecordEvent> {
        match self.size {
            Some(declared) if declared as usize != content.len() => {
                Err(RecordEvent::SizeMismatch { declared, actual: content.len() })
            }
            _ => Ok(()),
        }
    }

    fn check_checksum(&self, payload: &[u8]) -> Result<(), RecordEvent> {
        match self.checksum {
            Some(declared) => {
                let computed = binary::crc32(payload);
                if declared == computed {
                    Ok(())
                } else {
                    Err(RecordEvent::ChecksumMismatch { declared, computed })
                }
            }
            None => Ok(()),
        }
    }
}

/// Tag → variant dispatch table.
///
/// `Registry::default()` holds the built-in variants; callers may register
/// extension variants on their own instance.
#[derive(Debug, Clone)]
pub struct Registry {
    variants: BTreeMap<u8, Variant>,
}

impl Default for Registry {
    fn default() -> Self {
        let variants = BUILTIN_VARIANTS.iter().map(|v| (v.tag, *v)).collect();
        Self { variants }
    }
}

impl Registry {
    /// A registry without any variant.
    pub fn empty() -> Self {
        Self { variants: BTreeMap::new() }
    }

    /// Add a variant; fails if its tag is taken.
    pub fn register(&mut self, variant: Variant) -> Status {
        if let Some(existing) = self.variants.get(&variant.tag) {
            return RecordEvent::DuplicateTag { tag: variant.tag, existing: existing.name }.into_status();
        }
        self.variants.insert(variant.tag, variant);
        Status::success()
    }

    pub fn get(&self, tag: u8) -> Option<&Variant> {
        self.variants.get(&tag)
    }

    /// Registered variants in tag order.
    pub fn variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.values()
    }

    /// Dispatch on the first byte and decode.
    pub fn decode(&self, bytes: &[u8]) -> Outcome<Record> {
        let Some(&tag) = bytes.first() else {
            return Outcome::error(RecordEvent::NotEnoughBytes { variant: "any", expected: 1, actual: 0 });
        };
        match self.variants.get(&tag) {
            Some(variant) => variant.decode(bytes),
            None => Outcome::error(RecordEvent::UnknownTag(tag)),
        }
    }
}

impl RecordEvent {
    fn into_status(self) -> Status {
        Status::from(crate::outcome::Event::from(self))
    }
}

/// A decoded (or freshly built) record: wire bytes plus the usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    variant: Variant,
    bytes: Vec<u8>,
    payload: Vec<u8>,
}

impl Record {
    pub fn builder(variant: Variant) -> RecordBuilder {
        RecordBuilder::new(variant)
    }

    /// Decode with the built-in variants.
    pub fn decode(bytes: &[u8]) -> Outcome<Record> {
        Registry::default().decode(bytes)
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// The wire representation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The payload, already inflated for compressed variants.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// The payload viewed as UTF-8 (strict or lossy).
    pub fn payload_text(&self, lossy: bool) -> Outcome<String> {
        watermark::decode_utf8(&self.payload, lossy)
    }

    /// The wire bytes as a watermark ready for embedding.
    pub fn to_watermark(&self) -> Watermark {
        Watermark::new(self.bytes.clone())
    }

    pub fn declared_size(&self) -> Option<u32> {
        self.header().size
    }

    pub fn declared_checksum(&self) -> Option<u32> {
        self.header().checksum
    }

    fn header(&self) -> Header {
        self.variant
            .read_header(&self.bytes)
            .unwrap_or(Header { size: None, checksum: None })
    }

    /// Re-check tag, declared size and checksum against the held payload
    /// without dispatching or inflating again.
    pub fn validate(&self) -> Status {
        let header = match self.variant.read_header(&self.bytes) {
            Ok(header) => header,
            Err(event) => return event.into_status(),
        };
        let content = &self.bytes[self.variant.header_len()..];
        let mut status = Status::success();
        if let Err(event) = header.check_size(content) {
            status.add_event(event);
        }
        if let Err(event) = header.check_checksum(&self.payload) {
            status.add_event(event);
        }
        status
    }
}

/// Accumulates a payload and produces the final record bytes.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    variant: Variant,
    payload: Vec<u8>,
}

impl RecordBuilder {
    pub fn new(variant: Variant) -> Self {
        Self { variant, payload: Vec::new() }
    }

    /// Append payload bytes.
    pub fn payload(mut self, bytes: impl AsRef<[u8]>) -> Self {
        self.payload.extend_from_slice(bytes.as_ref());
        self
    }

    /// Append UTF-8 text to the payload.
    pub fn text(self, text: &str) -> Self {
        self.payload(text.as_bytes())
    }

    pub fn push(&mut self, bytes: &[u8]) -> &mut Self {
        self.payload.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Outcome<Record> {
        let variant = self.variant;
        let content = if variant.compressed {
            binary::compress(&self.payload)
        } else {
            self.payload.clone()
        };
        if variant.sized && u32::try_from(content.len()).is_err() {
            return Outcome::error(RecordEvent::PayloadTooLarge { len: content.len() });
        }

        let mut bytes = Vec::with_capacity(variant.header_len() + content.len());
        bytes.push(variant.tag);
        if variant.sized {
            bytes.extend_from_slice(&(content.len() as u32).to_le_bytes());
        }
        if variant.checksummed {
            bytes.extend_from_slice(&binary::crc32(&self.payload).to_le_bytes());
        }
        bytes.extend_from_slice(&content);

        Outcome::success(Record { variant, bytes, payload: self.payload })
    }
}
