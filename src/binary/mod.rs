// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Binary primitives: little-endian field reading, raw deflate and CRC-32.
//!
//! Writers use `to_le_bytes()` directly; readers go through [`ByteReader`],
//! which never panics on short input and reports how many bytes it wanted.

pub mod compression;

pub use compression::{compress, decompress, CompressionEvent, MAX_INFLATED_LEN};

/// CRC-32 (IEEE, reflected polynomial `0xEDB88320`, all-ones init/final xor).
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// Forward-only cursor over a byte slice with little-endian integer reads.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    pub fn read_u16_le(&mut self) -> Option<u16> {
        let bytes = self.read_bytes(2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        let bytes = self.read_bytes(4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Borrow the next `len` bytes, or `None` (without advancing) if fewer remain.
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Everything not yet consumed.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let data = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0xFF];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u32_le(), Some(0x0403_4B50));
        assert_eq!(reader.read_u16_le(), Some(0x0014));
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_u16_le(), None);
        // A failed read does not consume anything.
        assert_eq!(reader.position(), 6);
        assert_eq!(reader.read_u8(), Some(0xFF));
        assert_eq!(reader.read_u8(), None);
    }

    #[test]
    fn rest_consumes_everything() {
        let data = [1u8, 2, 3, 4];
        let mut reader = ByteReader::new(&data);
        reader.read_u8();
        assert_eq!(reader.rest(), &[2, 3, 4]);
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.rest(), &[] as &[u8]);
    }

    #[test]
    fn crc32_check_value() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b""), 0);
    }
}
