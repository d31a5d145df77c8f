// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! ZIP carrier: the first local file header plus everything after it.
//!
//! The watermark travels as an extra field with a reserved id inside the
//! local file header. The rest of the archive is kept as an opaque blob, so
//! [`ZipFile::to_bytes`] rebuilds the input byte for byte.

mod error;
pub mod header;

pub use error::ZipEvent;
pub use header::{ExtraField, LocalFileHeader, FIXED_HEADER_LEN, LOCAL_FILE_HEADER_SIGNATURE, MAX_EXTRA_FIELD_LEN};

use crate::outcome::{Outcome, Status};
use crate::watermark::{self, Watermark};

/// Extra-field id reserved for watermarks.
pub const WATERMARK_FIELD_ID: u16 = 0x8777;

/// A parsed ZIP carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipFile {
    header: LocalFileHeader,
    content: Vec<u8>,
}

impl ZipFile {
    /// Parse `bytes` and verify that serialising reproduces them.
    pub fn parse(bytes: &[u8]) -> Outcome<Self> {
        let (status, header) = LocalFileHeader::parse(bytes).into_parts();
        let Some(header) = header.filter(|_| !status.is_error()) else {
            return status.into_empty();
        };
        let header_len = header.header_len();
        if header.to_bytes() != bytes[..header_len] {
            return Outcome::error(ZipEvent::RoundTripMismatch);
        }
        tracing::debug!(header_len, fields = header.extra_fields().len(), "parsed zip header");
        Outcome::success(Self { header, content: bytes[header_len..].to_vec() })
    }

    pub fn new(header: LocalFileHeader, content: Vec<u8>) -> Self {
        Self { header, content }
    }

    pub fn header(&self) -> &LocalFileHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut LocalFileHeader {
        &mut self.header
    }

    /// Everything after the local file header.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = self.header.to_bytes();
        out.extend_from_slice(&self.content);
        out
    }
}

/// Stores watermarks as extra fields of a [`ZipFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipWatermarker {
    field_id: u16,
}

impl Default for ZipWatermarker {
    fn default() -> Self {
        Self { field_id: WATERMARK_FIELD_ID }
    }
}

impl ZipWatermarker {
    /// Use a different extra-field id.
    pub fn with_field_id(field_id: u16) -> Self {
        Self { field_id }
    }

    pub fn field_id(&self) -> u16 {
        self.field_id
    }

    /// Append `watermark` as a new extra field.
    pub fn add_watermark(&self, file: &mut ZipFile, watermark: &Watermark) -> Status {
        tracing::debug!(len = watermark.len(), "adding zip watermark field");
        file.header.add_extra_field(ExtraField::new(self.field_id, watermark.as_bytes()))
    }

    /// Every watermark field, in header order.
    pub fn get_watermarks(&self, file: &ZipFile, squash: bool, single_watermark: bool) -> Outcome<Vec<Watermark>> {
        let found = file
            .header
            .extra_fields()
            .iter()
            .filter(|field| field.id == self.field_id)
            .map(|field| Watermark::new(field.data.clone()))
            .collect();
        watermark::select(found, squash, single_watermark)
    }

    /// Remove every watermark field and return the watermarks.
    pub fn remove_watermarks(&self, file: &mut ZipFile) -> Outcome<Vec<Watermark>> {
        let removed = file
            .header
            .remove_extra_fields(self.field_id)
            .into_iter()
            .map(|field| Watermark::new(field.data))
            .collect();
        Outcome::success(removed)
    }

    pub fn contains_watermark(&self, file: &ZipFile) -> bool {
        file.header.extra_fields().iter().any(|field| field.id == self.field_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_zip() -> Vec<u8> {
        let mut header = LocalFileHeader::new("a.txt").into_result().unwrap();
        header.compressed_size = 3;
        header.uncompressed_size = 3;
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(b"abc");
        // Central directory stand-in; kept opaque.
        bytes.extend_from_slice(&[0x50, 0x4B, 0x01, 0x02, 0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn parse_keeps_content_opaque() {
        let bytes = sample_zip();
        let file = ZipFile::parse(&bytes).into_result().unwrap();
        assert_eq!(file.header().file_name(), b"a.txt");
        assert_eq!(&file.content()[..3], b"abc");
        assert_eq!(file.to_bytes(), bytes);
    }

    #[test]
    fn add_get_remove() {
        let wm = ZipWatermarker::default();
        let mut file = ZipFile::parse(&sample_zip()).into_result().unwrap();
        assert!(!wm.contains_watermark(&file));

        assert!(wm.add_watermark(&mut file, &Watermark::from("Okay")).is_success());
        assert!(wm.add_watermark(&mut file, &Watermark::from("Okay")).is_success());
        assert!(wm.contains_watermark(&file));

        let reparsed = ZipFile::parse(&file.to_bytes()).into_result().unwrap();
        assert_eq!(reparsed, file);
        let found = wm.get_watermarks(&reparsed, true, false).into_result().unwrap();
        assert_eq!(found, vec![Watermark::from("Okay")]);

        let removed = wm.remove_watermarks(&mut file).into_result().unwrap();
        assert_eq!(removed.len(), 2);
        assert!(!wm.contains_watermark(&file));
        assert_eq!(file.to_bytes(), sample_zip());
    }

    #[test]
    fn other_fields_are_left_alone() {
        let wm = ZipWatermarker::default();
        let mut file = ZipFile::parse(&sample_zip()).into_result().unwrap();
        file.header_mut().add_extra_field(ExtraField::new(0x5455, vec![9; 5]));
        wm.add_watermark(&mut file, &Watermark::from("x"));
        wm.remove_watermarks(&mut file);
        assert_eq!(file.header().extra_fields(), &[ExtraField::new(0x5455, vec![9; 5])]);
    }

    #[test]
    fn not_a_zip() {
        let parsed = ZipFile::parse(b"just some text, definitely not a zip file");
        assert!(parsed.is_error());
        assert!(parsed.status().to_string().contains("Invalid local file header signature"));
    }
}
