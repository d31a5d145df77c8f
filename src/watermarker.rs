// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! One entry point over every carrier kind.
//!
//! [`Watermarker`] owns a configured text and ZIP watermarker plus the
//! extension registry used to pick between them. It holds no global state;
//! build as many differently configured instances as needed.

use std::path::Path;

use crate::carrier::{Carrier, FileType, FileTypeRegistry};
use crate::file;
use crate::outcome::{Outcome, Status};
use crate::record::{Record, Registry};
use crate::text::TextWatermarker;
use crate::watermark::Watermark;
use crate::zip::ZipWatermarker;

#[derive(Debug, Clone, Default)]
pub struct Watermarker {
    text: TextWatermarker,
    zip: ZipWatermarker,
    file_types: FileTypeRegistry,
}

impl Watermarker {
    pub fn new(text: TextWatermarker, zip: ZipWatermarker, file_types: FileTypeRegistry) -> Self {
        Self { text, zip, file_types }
    }

    pub fn text(&self) -> &TextWatermarker {
        &self.text
    }

    pub fn zip(&self) -> &ZipWatermarker {
        &self.zip
    }

    pub fn file_types(&self) -> &FileTypeRegistry {
        &self.file_types
    }

    /// Parse `bytes` as the carrier kind registered for `extension`.
    pub fn parse_carrier(&self, bytes: &[u8], extension: &str) -> Outcome<Carrier> {
        let (mut status, file_type) = self.file_types.resolve(extension).into_parts();
        let Some(file_type) = file_type else {
            return status.into_empty();
        };
        let (parse_status, carrier) = Carrier::from_bytes(bytes, file_type).into_parts();
        status.append(parse_status);
        Outcome::new(status, carrier)
    }

    /// Read and parse the file at `path`, picking the kind by its extension.
    pub fn read_carrier(&self, path: impl AsRef<Path>) -> Outcome<Carrier> {
        let path = path.as_ref();
        let (mut status, file_type) = self.file_types.resolve_path(path).into_parts();
        let Some(file_type) = file_type else {
            return status.into_empty();
        };
        let (read_status, bytes) = file::read(path).into_parts();
        status.append(read_status);
        let Some(bytes) = bytes else {
            return status.into_empty();
        };
        let (parse_status, carrier) = Carrier::from_bytes(&bytes, file_type).into_parts();
        status.append(parse_status);
        Outcome::new(status, carrier)
    }

    pub fn write_carrier(&self, path: impl AsRef<Path>, carrier: &Carrier) -> Status {
        file::write(path, &carrier.to_bytes())
    }

    /// Embed `watermark` into `carrier`. On Error the carrier is unchanged.
    pub fn add_watermark(&self, carrier: &mut Carrier, watermark: &Watermark) -> Status {
        match carrier {
            Carrier::Text(text) => {
                let (status, embedding) = self.text.add_watermark(text, watermark).into_parts();
                if let Some(embedding) = embedding.filter(|_| !status.is_error()) {
                    *text = embedding.text;
                }
                status
            }
            Carrier::Zip(file) => self.zip.add_watermark(file, watermark),
        }
    }

    pub fn get_watermarks(&self, carrier: &Carrier, squash: bool, single_watermark: bool) -> Outcome<Vec<Watermark>> {
        match carrier {
            Carrier::Text(text) => self.text.get_watermarks(text, squash, single_watermark),
            Carrier::Zip(file) => self.zip.get_watermarks(file, squash, single_watermark),
        }
    }

    /// Strip every watermark from `carrier` and return what was removed.
    pub fn remove_watermarks(&self, carrier: &mut Carrier) -> Outcome<Vec<Watermark>> {
        match carrier {
            Carrier::Text(text) => {
                let (status, removal) = self.text.remove_watermarks(text).into_parts();
                match removal {
                    Some(removal) => {
                        *text = removal.text;
                        status.into_outcome(removal.watermarks)
                    }
                    None => status.into_empty(),
                }
            }
            Carrier::Zip(file) => self.zip.remove_watermarks(file),
        }
    }

    pub fn contains_watermark(&self, carrier: &Carrier) -> bool {
        match carrier {
            Carrier::Text(text) => self.text.contains_watermark(text),
            Carrier::Zip(file) => self.zip.contains_watermark(file),
        }
    }

    /// Extract every watermark and decode it as a record with `registry`.
    ///
    /// Watermarks that fail to decode are skipped; their events stay in the
    /// returned status, so the result may be an Error carrying the records
    /// that did decode.
    pub fn get_records(&self, carrier: &Carrier, registry: &Registry) -> Outcome<Vec<Record>> {
        let (mut status, watermarks) = self.get_watermarks(carrier, false, false).into_parts();
        let mut records = Vec::new();
        for watermark in watermarks.unwrap_or_default() {
            let (record_status, record) = registry.decode(watermark.as_bytes()).into_parts();
            status.append(record_status);
            records.extend(record);
        }
        tracing::debug!(records = records.len(), severity = %status.severity(), "decoded records");
        Outcome::new(status, Some(records))
    }

    /// Kind of carrier registered for `extension`, if any.
    pub fn file_type(&self, extension: &str) -> Option<FileType> {
        self.file_types.get(extension)
    }
}
