// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Conditions reported by the text watermarker.

use core::fmt;

use crate::outcome::{Event, Severity};

pub(crate) const SOURCE: &str = "TextWatermarker";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent {
    /// The carrier already holds alphabet or separator characters.
    ContainsMarkerChars { offset: usize },
    /// There is no slot at all for watermark characters.
    InsufficientPositions { required: usize, available: usize },
    /// Only the leading part of one occurrence fit into the carrier.
    OversizedWatermark { required: usize, inserted: usize },
    /// A run was opened but never closed.
    IncompleteWatermark { offset: usize },
    /// Removal went ahead although extraction reported a warning or an error.
    RemovedDespiteProblems,
    /// A separator is also an alphabet character.
    SeparatorCollision(char),
    /// Start and end separators are the same character.
    IdenticalSeparators(char),
    /// The plain space is reserved for empty slots.
    SpaceAsMarker,
}

impl TextEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::OversizedWatermark { .. }
            | Self::IncompleteWatermark { .. }
            | Self::RemovedDespiteProblems => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for TextEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContainsMarkerChars { offset } => write!(
                f,
                "The input contains watermark characters (first at offset {offset}): adding a watermark would make the input unusable, it may already contain a watermark."
            ),
            Self::InsufficientPositions { required, available } => write!(
                f,
                "The input has no position to insert a watermark ({required} required, {available} available)."
            ),
            Self::OversizedWatermark { required, inserted } => write!(
                f,
                "The watermark is too large for the input and was inserted only partially ({required} required, {inserted} inserted)."
            ),
            Self::IncompleteWatermark { offset } => write!(
                f,
                "Could not restore a complete watermark starting at offset {offset}; decoded its complete part only."
            ),
            Self::RemovedDespiteProblems => {
                write!(f, "The extraction of watermarks had a problem; watermark(s) removed anyway.")
            }
            Self::SeparatorCollision(ch) => write!(
                f,
                "The separator U+{:04X} is also part of the transcoding alphabet.",
                *ch as u32
            ),
            Self::IdenticalSeparators(ch) => write!(
                f,
                "The start and end separators must differ, both are U+{:04X}.",
                *ch as u32
            ),
            Self::SpaceAsMarker => {
                write!(f, "The plain space cannot be used as an alphabet or separator character.")
            }
        }
    }
}

impl From<TextEvent> for Event {
    fn from(event: TextEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}
