// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Conditions reported by the ZIP adapter.

use core::fmt;

use crate::outcome::{Event, Severity};

pub(crate) const SOURCE: &str = "ZipWatermarker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZipEvent {
    /// The first four bytes are not a local file header signature.
    InvalidMagic { found: u32 },
    /// The buffer ends before the header it declares.
    NotEnoughBytes { expected: usize, actual: usize },
    /// The extra-field area ends inside a field.
    TruncatedExtraField { offset: usize, remaining: usize },
    /// A field would push the extra-field area past its 16-bit length.
    ExtraFieldOverflow { size: usize, max: usize },
    /// The file name does not fit the 16-bit length field.
    FileNameTooLong { len: usize },
    /// Serialising the parsed header did not reproduce the input.
    RoundTripMismatch,
}

impl ZipEvent {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for ZipEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMagic { found } => write!(
                f,
                "Invalid local file header signature 0x{found:08X}, expected 0x{:08X}.",
                super::header::LOCAL_FILE_HEADER_SIGNATURE
            ),
            Self::NotEnoughBytes { expected, actual } => write!(
                f,
                "Not enough bytes for a local file header: expected {expected}, got {actual}."
            ),
            Self::TruncatedExtraField { offset, remaining } => write!(
                f,
                "The extra field at offset {offset} is truncated: only {remaining} bytes remain."
            ),
            Self::ExtraFieldOverflow { size, max } => write!(
                f,
                "The extra fields would grow to {size} bytes, the maximum is {max} bytes."
            ),
            Self::FileNameTooLong { len } => {
                write!(f, "The file name of {len} bytes exceeds the maximum of {} bytes.", u16::MAX)
            }
            Self::RoundTripMismatch => {
                write!(f, "The parsed header does not serialise back to the original bytes.")
            }
        }
    }
}

impl From<ZipEvent> for Event {
    fn from(event: ZipEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}
