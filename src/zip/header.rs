// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! ZIP local file header with its extra-field list.
//!
//! ```text
//! offset  size  field
//!  0      4     signature 0x04034b50
//!  4      2     version needed to extract
//!  6      2     general purpose flags
//!  8      2     compression method
//! 10      2     last modification time
//! 12      2     last modification date
//! 14      4     CRC-32 of the uncompressed data
//! 18      4     compressed size
//! 22      4     uncompressed size
//! 26      2     file name length (n)
//! 28      2     extra field length (m)
//! 30      n     file name
//! 30+n    m     extra fields: [id u16][len u16][data]*
//! ```
//!
//! All integers are little-endian. Parsing keeps every byte, so serialising
//! an unmodified header reproduces its input exactly.

use crate::binary::ByteReader;
use crate::outcome::{Event, Outcome, Status};

use super::error::ZipEvent;

/// Signature of a local file header, read as a little-endian u32.
pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x0403_4B50;

/// Size of the header up to and including the extra field length.
pub const FIXED_HEADER_LEN: usize = 30;

/// Largest extra-field area the 16-bit length field can describe.
pub const MAX_EXTRA_FIELD_LEN: usize = u16::MAX as usize;

/// Id and length prefix of every extra field.
pub const EXTRA_FIELD_HEADER_LEN: usize = 4;

/// One extra field ("metadata chunk").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraField {
    pub id: u16,
    pub data: Vec<u8>,
}

impl ExtraField {
    pub fn new(id: u16, data: impl Into<Vec<u8>>) -> Self {
        Self { id, data: data.into() }
    }

    /// Serialised length including the id/length prefix.
    pub fn encoded_len(&self) -> usize {
        EXTRA_FIELD_HEADER_LEN + self.data.len()
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&(self.data.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.data);
    }
}

/// A parsed local file header. The header exclusively owns its extra fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub compression: u16,
    pub mod_time: u16,
    pub mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    file_name: Vec<u8>,
    extra_fields: Vec<ExtraField>,
}

impl LocalFileHeader {
    /// An empty header for `file_name` (stored, no extra fields).
    pub fn new(file_name: impl Into<Vec<u8>>) -> Outcome<Self> {
        let file_name = file_name.into();
        if file_name.len() > u16::MAX as usize {
            return Outcome::error(ZipEvent::FileNameTooLong { len: file_name.len() });
        }
        Outcome::success(Self {
            version_needed: 10,
            flags: 0,
            compression: 0,
            mod_time: 0,
            mod_date: 0,
            crc32: 0,
            compressed_size: 0,
            uncompressed_size: 0,
            file_name,
            extra_fields: Vec::new(),
        })
    }

    /// Parse the header at the start of `data`; trailing bytes are ignored.
    ///
    /// The signature is checked first. A buffer shorter than the fixed part,
    /// or than the fixed part plus the declared name and extra lengths, is
    /// reported as "not enough bytes".
    pub fn parse(data: &[u8]) -> Outcome<Self> {
        let mut reader = ByteReader::new(data);
        let Some(signature) = reader.read_u32_le() else {
            return Outcome::error(ZipEvent::NotEnoughBytes { expected: FIXED_HEADER_LEN, actual: data.len() });
        };
        if signature != LOCAL_FILE_HEADER_SIGNATURE {
            return Outcome::error(ZipEvent::InvalidMagic { found: signature });
        }
        let Some((mut header, name_len, extra_len)) = Self::read_fixed(&mut reader) else {
            return Outcome::error(ZipEvent::NotEnoughBytes { expected: FIXED_HEADER_LEN, actual: data.len() });
        };

        let total = FIXED_HEADER_LEN + name_len + extra_len;
        let (Some(file_name), Some(extra)) = (reader.read_bytes(name_len), reader.read_bytes(extra_len)) else {
            return Outcome::error(ZipEvent::NotEnoughBytes { expected: total, actual: data.len() });
        };
        header.file_name = file_name.to_vec();
        header.extra_fields = match parse_extra_fields(extra, FIXED_HEADER_LEN + name_len) {
            Ok(fields) => fields,
            Err(event) => return Outcome::error(event),
        };
        Outcome::success(header)
    }

    fn read_fixed(reader: &mut ByteReader<'_>) -> Option<(Self, usize, usize)> {
        let header = Self {
            version_needed: reader.read_u16_le()?,
            flags: reader.read_u16_le()?,
            compression: reader.read_u16_le()?,
            mod_time: reader.read_u16_le()?,
            mod_date: reader.read_u16_le()?,
            crc32: reader.read_u32_le()?,
            compressed_size: reader.read_u32_le()?,
            uncompressed_size: reader.read_u32_le()?,
            file_name: Vec::new(),
            extra_fields: Vec::new(),
        };
        let name_len = reader.read_u16_le()? as usize;
        let extra_len = reader.read_u16_le()? as usize;
        Some((header, name_len, extra_len))
    }

    pub fn file_name(&self) -> &[u8] {
        &self.file_name
    }

    pub fn extra_fields(&self) -> &[ExtraField] {
        &self.extra_fields
    }

    /// Length of the extra-field area, as written to the length field.
    pub fn extra_len(&self) -> usize {
        self.extra_fields.iter().map(ExtraField::encoded_len).sum()
    }

    /// Total header length; the file content starts at this offset.
    pub fn header_len(&self) -> usize {
        FIXED_HEADER_LEN + self.file_name.len() + self.extra_len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_len());
        out.extend_from_slice(&LOCAL_FILE_HEADER_SIGNATURE.to_le_bytes());
        out.extend_from_slice(&self.version_needed.to_le_bytes());
        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.mod_time.to_le_bytes());
        out.extend_from_slice(&self.mod_date.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
        out.extend_from_slice(&self.compressed_size.to_le_bytes());
        out.extend_from_slice(&self.uncompressed_size.to_le_bytes());
        out.extend_from_slice(&(self.file_name.len() as u16).to_le_bytes());
        out.extend_from_slice(&(self.extra_len() as u16).to_le_bytes());
        out.extend_from_slice(&self.file_name);
        for field in &self.extra_fields {
            field.write_to(&mut out);
        }
        out
    }

    /// Append an extra field unless the area would outgrow its length field.
    pub fn add_extra_field(&mut self, field: ExtraField) -> Status {
        let size = self.extra_len() + field.encoded_len();
        if size > MAX_EXTRA_FIELD_LEN {
            return Status::from(Event::from(ZipEvent::ExtraFieldOverflow {
                size,
                max: MAX_EXTRA_FIELD_LEN,
            }));
        }
        self.extra_fields.push(field);
        Status::success()
    }

    /// Remove and return every extra field with `id`, in header order.
    pub fn remove_extra_fields(&mut self, id: u16) -> Vec<ExtraField> {
        let (removed, kept): (Vec<_>, Vec<_>) = self.extra_fields.drain(..).partition(|field| field.id == id);
        self.extra_fields = kept;
        removed
    }
}

/// Split an extra-field area into fields. `base` is the area's offset in the
/// header, used for diagnostics.
fn parse_extra_fields(area: &[u8], base: usize) -> Result<Vec<ExtraField>, ZipEvent> {
    let mut reader = ByteReader::new(area);
    let mut fields = Vec::new();
    while reader.remaining() > 0 {
        let offset = base + reader.position();
        let truncated = ZipEvent::TruncatedExtraField { offset, remaining: reader.remaining() };
        let (Some(id), Some(len)) = (reader.read_u16_le(), reader.read_u16_le()) else {
            return Err(truncated);
        };
        let Some(data) = reader.read_bytes(len as usize) else {
            return Err(truncated);
        };
        fields.push(ExtraField::new(id, data));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut header = LocalFileHeader::new("hello.txt").into_result().unwrap();
        header.crc32 = 0x3610_A686;
        header.compressed_size = 5;
        header.uncompressed_size = 5;
        assert!(header.add_extra_field(ExtraField::new(0x5455, vec![1, 2, 3, 4, 5])).is_success());
        header.to_bytes()
    }

    #[test]
    fn parse_serialize_identity() {
        let bytes = sample();
        let header = LocalFileHeader::parse(&bytes).into_result().unwrap();
        assert_eq!(header.file_name(), b"hello.txt");
        assert_eq!(header.extra_fields().len(), 1);
        assert_eq!(header.header_len(), 30 + 9 + 9);
        assert_eq!(header.to_bytes(), bytes);
    }

    #[test]
    fn magic_checked_first() {
        let mut bytes = sample();
        bytes[0] = 0x00;
        let parsed = LocalFileHeader::parse(&bytes);
        assert_eq!(
            parsed.status().to_string(),
            "Error (ZipWatermarker): Invalid local file header signature 0x04034B00, expected 0x04034B50."
        );
        // A short buffer with a bad signature still reports the signature.
        let parsed = LocalFileHeader::parse(&bytes[..8]);
        assert!(parsed.status().to_string().contains("signature"));
    }

    #[test]
    fn short_buffers_rejected() {
        let bytes = sample();
        let parsed = LocalFileHeader::parse(&bytes[..20]);
        assert_eq!(
            parsed.status().to_string(),
            "Error (ZipWatermarker): Not enough bytes for a local file header: expected 30, got 20."
        );
        let parsed = LocalFileHeader::parse(&bytes[..40]);
        assert_eq!(
            parsed.status().to_string(),
            "Error (ZipWatermarker): Not enough bytes for a local file header: expected 48, got 40."
        );
    }

    #[test]
    fn truncated_extra_field_rejected() {
        let mut bytes = sample();
        // Declare two more extra bytes than the field list holds.
        bytes[28] += 2;
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let parsed = LocalFileHeader::parse(&bytes);
        assert!(parsed.is_error());
        assert_eq!(
            parsed.status().to_string(),
            "Error (ZipWatermarker): The extra field at offset 48 is truncated: only 2 bytes remain."
        );
    }

    #[test]
    fn remove_filters_by_id() {
        let mut header = LocalFileHeader::new("a").into_result().unwrap();
        header.add_extra_field(ExtraField::new(1, vec![1]));
        header.add_extra_field(ExtraField::new(2, vec![2]));
        header.add_extra_field(ExtraField::new(1, vec![3]));
        let removed = header.remove_extra_fields(1);
        assert_eq!(removed, vec![ExtraField::new(1, vec![1]), ExtraField::new(1, vec![3])]);
        assert_eq!(header.extra_fields(), &[ExtraField::new(2, vec![2])]);
        assert_eq!(header.extra_len(), 5);
    }

    #[test]
    fn empty_field_still_takes_its_prefix() {
        let field = ExtraField::new(0xCAFE, Vec::new());
        assert_eq!(field.encoded_len(), EXTRA_FIELD_HEADER_LEN);

        let mut header = LocalFileHeader::new("a").into_result().unwrap();
        assert!(header.add_extra_field(field).is_success());
        assert_eq!(header.extra_len(), 4);
        let reparsed = LocalFileHeader::parse(&header.to_bytes()).into_result().unwrap();
        assert_eq!(reparsed, header);
    }
}
