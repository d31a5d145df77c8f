// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The watermark value: an opaque byte sequence moved into and out of carriers.

use core::fmt;

use crate::outcome::{Event, Outcome, Severity, Status};
use crate::record;

const SOURCE: &str = "Watermark";

/// Opaque payload bytes. Equality and ordering are by content only.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Watermark(Vec<u8>);

impl Watermark {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Interpret the bytes as UTF-8.
    ///
    /// Strict mode fails on invalid sequences. Lossy mode substitutes
    /// U+FFFD and downgrades the failure to a Warning.
    pub fn to_text(&self, lossy: bool) -> Outcome<String> {
        decode_utf8(&self.0, lossy)
    }
}

/// Conditions raised while viewing payload bytes as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkEvent {
    /// Strict decode hit an invalid UTF-8 sequence at `offset`.
    InvalidBytes { offset: usize },
    /// Lossy decode replaced invalid sequences.
    ReplacedInvalidBytes,
}

impl WatermarkEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidBytes { .. } => Severity::Error,
            Self::ReplacedInvalidBytes => Severity::Warning,
        }
    }
}

impl fmt::Display for WatermarkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBytes { offset } => {
                write!(f, "The watermark contains invalid byte(s) at offset {offset}.")
            }
            Self::ReplacedInvalidBytes => write!(
                f,
                "The watermark contains invalid byte(s) which were replaced with U+FFFD."
            ),
        }
    }
}

impl From<WatermarkEvent> for Event {
    fn from(event: WatermarkEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}

pub(crate) fn decode_utf8(bytes: &[u8], lossy: bool) -> Outcome<String> {
    match core::str::from_utf8(bytes) {
        Ok(text) => Outcome::success(text.to_string()),
        Err(_) if lossy => {
            let mut status = Status::success();
            status.add_event(WatermarkEvent::ReplacedInvalidBytes);
            status.into_outcome(String::from_utf8_lossy(bytes).into_owned())
        }
        Err(e) => Outcome::error(WatermarkEvent::InvalidBytes { offset: e.valid_up_to() }),
    }
}

/// Post-process an extraction result.
///
/// `single_watermark` keeps only the most frequent content (Warning on a
/// tie). Otherwise `squash` drops repeated content, keeping the first
/// occurrence of each.
pub(crate) fn select(watermarks: Vec<Watermark>, squash: bool, single_watermark: bool) -> Outcome<Vec<Watermark>> {
    if single_watermark && !watermarks.is_empty() {
        return record::most_frequent(&watermarks).map(|picked| vec![picked]);
    }
    if squash {
        let mut unique: Vec<Watermark> = Vec::with_capacity(watermarks.len());
        for watermark in watermarks {
            if !unique.contains(&watermark) {
                unique.push(watermark);
            }
        }
        return Outcome::success(unique);
    }
    Outcome::success(watermarks)
}

impl From<Vec<u8>> for Watermark {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Watermark {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Watermark {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<String> for Watermark {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl AsRef<[u8]> for Watermark {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_content() {
        assert_eq!(Watermark::from("Okay"), Watermark::new(b"Okay".to_vec()));
        assert!(Watermark::from("A") < Watermark::from("B"));
    }

    #[test]
    fn select_squash_and_single() {
        let found: Vec<Watermark> = ["Okay", "Test", "Okay"].into_iter().map(Watermark::from).collect();

        let all = select(found.clone(), false, false).into_value().unwrap();
        assert_eq!(all.len(), 3);

        let squashed = select(found.clone(), true, false).into_value().unwrap();
        assert_eq!(squashed, vec![Watermark::from("Okay"), Watermark::from("Test")]);

        let single = select(found, false, true);
        assert!(single.is_success());
        assert_eq!(single.into_value().unwrap(), vec![Watermark::from("Okay")]);

        let none = select(Vec::new(), false, true);
        assert!(none.is_success());
        assert!(none.into_value().unwrap().is_empty());
    }

    #[test]
    fn strict_text_rejects_invalid_bytes() {
        let watermark = Watermark::new(vec![b'o', b'k', 0xFF]);
        let text = watermark.to_text(false);
        assert!(text.is_error());
        assert_eq!(
            text.status().to_string(),
            "Error (Watermark): The watermark contains invalid byte(s) at offset 2."
        );
    }

    #[test]
    fn lossy_text_downgrades_to_warning() {
        let watermark = Watermark::new(vec![b'o', b'k', 0xFF]);
        let text = watermark.to_text(true);
        assert!(text.is_warning());
        assert_eq!(text.into_value().as_deref(), Some("ok\u{FFFD}"));
    }
}
