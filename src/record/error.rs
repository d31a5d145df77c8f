// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Conditions reported by the record envelope.

use core::fmt;

use crate::outcome::{Event, Severity};

pub(crate) const SOURCE: &str = "Record";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    /// No registered variant uses this tag.
    UnknownTag(u8),
    /// A variant with this tag is already registered.
    DuplicateTag { tag: u8, existing: &'static str },
    /// The input is shorter than the variant's header.
    NotEnoughBytes { variant: &'static str, expected: usize, actual: usize },
    /// The first byte is not the tag of the variant decoding it.
    TagMismatch { variant: &'static str, expected: u8, found: u8 },
    /// The declared content length differs from the stored content.
    SizeMismatch { declared: u32, actual: usize },
    /// The declared CRC-32 differs from the payload's.
    ChecksumMismatch { declared: u32, computed: u32 },
    /// The content does not fit the 32-bit size field.
    PayloadTooLarge { len: usize },
    /// Several payloads share the highest count; the first one was chosen.
    MultipleMostFrequent { tied: usize, count: usize },
    /// Most-frequent selection over nothing.
    EmptyCollection,
}

impl RecordEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::MultipleMostFrequent { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for RecordEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag(tag) => write!(f, "Unsupported or unknown record tag 0x{tag:02X}."),
            Self::DuplicateTag { tag, existing } => {
                write!(f, "The tag 0x{tag:02X} is already used by the {existing} variant.")
            }
            Self::NotEnoughBytes { variant, expected, actual } => write!(
                f,
                "Not enough bytes for a {variant} record: expected at least {expected}, got {actual}."
            ),
            Self::TagMismatch { variant, expected, found } => write!(
                f,
                "The {variant} variant expects tag 0x{expected:02X} but found 0x{found:02X}."
            ),
            Self::SizeMismatch { declared, actual } => write!(
                f,
                "The declared size does not match the content: {declared} declared, {actual} present."
            ),
            Self::ChecksumMismatch { declared, computed } => write!(
                f,
                "The checksum does not match the payload: 0x{declared:08X} declared, 0x{computed:08X} computed."
            ),
            Self::PayloadTooLarge { len } => write!(
                f,
                "The content of {len} bytes exceeds the maximum of {} bytes.",
                u32::MAX
            ),
            Self::MultipleMostFrequent { tied, count } => write!(
                f,
                "Found {tied} different most frequent watermarks (each occurring {count} times); returning the first."
            ),
            Self::EmptyCollection => write!(f, "Cannot select the most frequent of zero watermarks."),
        }
    }
}

impl From<RecordEvent> for Event {
    fn from(event: RecordEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}
