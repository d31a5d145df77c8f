// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Framing of watermark occurrences inside the carrier.
//!
//! ```text
//! Single:    S w S w S        (the closing separator also opens the next run)
//! StartEnd:  B w E B w E
//! ```
//!
//! Both strategies need `encoded + 2` slots for one complete occurrence.

/// Default single separator: THIN SPACE.
pub const DEFAULT_SEPARATOR: char = '\u{2009}';

/// How the start and end of an embedded occurrence are marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStrategy {
    /// One character both opens and closes occurrences.
    Single(char),
    /// Distinct opening and closing characters.
    StartEnd { start: char, end: char },
}

impl Default for SeparatorStrategy {
    fn default() -> Self {
        Self::Single(DEFAULT_SEPARATOR)
    }
}

/// Role of a separator character while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// Single separator: closes the current run and opens the next.
    Both,
    Start,
    End,
}

impl SeparatorStrategy {
    /// All separator characters used by this strategy.
    pub fn chars(&self) -> Vec<char> {
        match *self {
            Self::Single(sep) => vec![sep],
            Self::StartEnd { start, end } => vec![start, end],
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.boundary(ch).is_some()
    }

    pub(crate) fn boundary(&self, ch: char) -> Option<Boundary> {
        match *self {
            Self::Single(sep) if ch == sep => Some(Boundary::Both),
            Self::StartEnd { start, .. } if ch == start => Some(Boundary::Start),
            Self::StartEnd { end, .. } if ch == end => Some(Boundary::End),
            _ => None,
        }
    }

    /// Slots consumed by each repeated occurrence.
    pub fn stride(&self, encoded_len: usize) -> usize {
        match self {
            Self::Single(_) => encoded_len + 1,
            Self::StartEnd { .. } => encoded_len + 2,
        }
    }

    /// Slots appended once after the last occurrence.
    fn trailer_len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::StartEnd { .. } => 0,
        }
    }

    /// Slots needed for a single complete occurrence.
    pub fn required(&self, encoded_len: usize) -> usize {
        self.stride(encoded_len) + self.trailer_len()
    }

    /// How many complete occurrences fit into `available` slots.
    pub fn repeats(&self, encoded_len: usize, available: usize) -> usize {
        if available < self.required(encoded_len) {
            return 0;
        }
        (available - self.trailer_len()) / self.stride(encoded_len)
    }

    /// The character stream for `repeats` occurrences of `encoded`.
    pub fn frame(&self, encoded: &[char], repeats: usize) -> Vec<char> {
        let mut out = Vec::with_capacity(repeats * self.stride(encoded.len()) + self.trailer_len());
        match *self {
            Self::Single(sep) => {
                for _ in 0..repeats {
                    out.push(sep);
                    out.extend_from_slice(encoded);
                }
                out.push(sep);
            }
            Self::StartEnd { start, end } => {
                for _ in 0..repeats {
                    out.push(start);
                    out.extend_from_slice(encoded);
                    out.push(end);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_framing() {
        let s = SeparatorStrategy::Single('|');
        assert_eq!(s.frame(&['a', 'b'], 2), vec!['|', 'a', 'b', '|', 'a', 'b', '|']);
        assert_eq!(s.required(2), 4);
        assert_eq!(s.repeats(2, 3), 0);
        assert_eq!(s.repeats(2, 4), 1);
        assert_eq!(s.repeats(2, 6), 1);
        assert_eq!(s.repeats(2, 7), 2);
    }

    #[test]
    fn start_end_framing() {
        let s = SeparatorStrategy::StartEnd { start: '<', end: '>' };
        assert_eq!(s.frame(&['a'], 2), vec!['<', 'a', '>', '<', 'a', '>']);
        assert_eq!(s.required(1), 3);
        assert_eq!(s.repeats(1, 5), 1);
        assert_eq!(s.repeats(1, 6), 2);
    }

    #[test]
    fn boundaries() {
        let s = SeparatorStrategy::StartEnd { start: '<', end: '>' };
        assert_eq!(s.boundary('<'), Some(Boundary::Start));
        assert_eq!(s.boundary('>'), Some(Boundary::End));
        assert_eq!(s.boundary('x'), None);
        assert_eq!(SeparatorStrategy::Single('|').boundary('|'), Some(Boundary::Both));
    }
}
