// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Byte ↔ invisible-character transcoding.
//!
//! Each byte is split into four 2-bit groups, most significant first, and
//! every group selects one of four alphabet characters:
//!
//! ```text
//! 0b11_01_00_10  ->  alphabet[3] alphabet[1] alphabet[0] alphabet[2]
//! ```
//!
//! Decoding is the exact inverse and can run lazily over any `char` iterator
//! through [`DecodeStream`].

use core::fmt;

use crate::outcome::{Event, Outcome, Severity, Status};

const SOURCE: &str = "Transcoding";

/// Alphabet characters emitted per input byte.
pub const CHARS_PER_BYTE: usize = 4;

/// Default alphabet for the 2-bit values `0..=3`: THREE-PER-EM SPACE,
/// FOUR-PER-EM SPACE, SIX-PER-EM SPACE and PUNCTUATION SPACE.
pub const DEFAULT_ALPHABET: [char; 4] = ['\u{2004}', '\u{2005}', '\u{2006}', '\u{2008}'];

/// Problems found while configuring or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscodingEvent {
    /// The same character appears twice in the alphabet.
    DuplicateAlphabetChar(char),
    /// A character outside the alphabet aborted the decode group at `offset`.
    UnknownChar { ch: char, offset: usize },
    /// The input ended inside a group of `chars` characters.
    IncompleteGroup { chars: usize },
}

impl TranscodingEvent {
    pub fn severity(&self) -> Severity {
        match self {
            Self::DuplicateAlphabetChar(_) | Self::UnknownChar { .. } => Severity::Error,
            Self::IncompleteGroup { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for TranscodingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateAlphabetChar(ch) => {
                write!(f, "The alphabet contains U+{:04X} more than once.", *ch as u32)
            }
            Self::UnknownChar { ch, offset } => write!(
                f,
                "Unknown character U+{:04X} at offset {offset} is not part of the alphabet.",
                *ch as u32
            ),
            Self::IncompleteGroup { chars } => write!(
                f,
                "The input ended after {chars} of {CHARS_PER_BYTE} characters of a byte; the incomplete byte was dropped."
            ),
        }
    }
}

impl From<TranscodingEvent> for Event {
    fn from(event: TranscodingEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}

/// A four-character alphabet used to transcode bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transcoding {
    alphabet: [char; 4],
}

impl Default for Transcoding {
    fn default() -> Self {
        Self { alphabet: DEFAULT_ALPHABET }
    }
}

impl Transcoding {
    /// Create a transcoding; fails if a character repeats.
    pub fn new(alphabet: [char; 4]) -> Outcome<Self> {
        for (i, ch) in alphabet.iter().enumerate() {
            if alphabet[i + 1..].contains(ch) {
                return Outcome::error(TranscodingEvent::DuplicateAlphabetChar(*ch));
            }
        }
        Outcome::success(Self { alphabet })
    }

    pub fn alphabet(&self) -> &[char; 4] {
        &self.alphabet
    }

    pub fn contains(&self, ch: char) -> bool {
        self.alphabet.contains(&ch)
    }

    /// Number of characters needed for `bytes` input bytes.
    pub fn encoded_len(bytes: usize) -> usize {
        bytes * CHARS_PER_BYTE
    }

    /// Lazily encode `bytes`.
    pub fn encode_iter<'a>(&'a self, bytes: &'a [u8]) -> impl Iterator<Item = char> + 'a {
        bytes.iter().flat_map(move |&byte| {
            [6u8, 4, 2, 0].map(|shift| self.alphabet[((byte >> shift) & 0b11) as usize])
        })
    }

    pub fn encode(&self, bytes: &[u8]) -> Vec<char> {
        let mut out = Vec::with_capacity(Self::encoded_len(bytes.len()));
        out.extend(self.encode_iter(bytes));
        out
    }

    /// Pull-based decoder over `chars`. Restartable by cloning when the
    /// underlying iterator is `Clone`.
    pub fn decode_stream<I: IntoIterator<Item = char>>(&self, chars: I) -> DecodeStream<I::IntoIter> {
        DecodeStream { alphabet: self.alphabet, chars: chars.into_iter(), offset: 0, done: false }
    }

    /// Decode everything.
    ///
    /// An unknown character is an Error (no value). A trailing incomplete
    /// group is dropped with a Warning.
    pub fn decode<I: IntoIterator<Item = char>>(&self, chars: I) -> Outcome<Vec<u8>> {
        let mut status = Status::success();
        let mut bytes = Vec::new();
        for item in self.decode_stream(chars) {
            match item {
                Ok(byte) => bytes.push(byte),
                Err(event) => status.add_event(event),
            }
        }
        if status.is_error() {
            status.into_empty()
        } else {
            status.into_outcome(bytes)
        }
    }
}

/// Iterator yielding one decoded byte per four alphabet characters.
///
/// An unknown character yields an `Err` for the group it appeared in and
/// decoding resumes right after it. A partial group at the end yields a final
/// `Err`.
#[derive(Debug, Clone)]
pub struct DecodeStream<I> {
    alphabet: [char; 4],
    chars: I,
    offset: usize,
    done: bool,
}

impl<I: Iterator<Item = char>> Iterator for DecodeStream<I> {
    type Item = Result<u8, TranscodingEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut byte = 0u8;
        for taken in 0..CHARS_PER_BYTE {
            let Some(ch) = self.chars.next() else {
                self.done = true;
                return if taken == 0 {
                    None
                } else {
                    Some(Err(TranscodingEvent::IncompleteGroup { chars: taken }))
                };
            };
            let offset = self.offset;
            self.offset += 1;
            match self.alphabet.iter().position(|&a| a == ch) {
                Some(value) => byte = (byte << 2) | value as u8,
                None => return Some(Err(TranscodingEvent::UnknownChar { ch, offset })),
            }
        }
        Some(Ok(byte))
    }
}
