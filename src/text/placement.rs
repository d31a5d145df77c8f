// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Placement policies: which character offsets of a text may hold a
//! transcoded character.
//!
//! A policy is a pure function of the text. The orchestrator always hands it
//! a view in which every watermark character reads as a plain space, so the
//! same slots are found before and after marking.

/// Maps carrier text to ordered character offsets usable as slots.
///
/// A slot must hold a plain space: the watermarker replaces that space with
/// a watermark character and writes it back on removal. Offsets pointing at
/// anything else are ignored.
pub trait Placement {
    fn positions(&self, text: &str) -> Vec<usize>;
}

impl<F> Placement for F
where
    F: Fn(&str) -> Vec<usize>,
{
    fn positions(&self, text: &str) -> Vec<usize> {
        self(text)
    }
}

/// Default policy: every plain space, i.e. the slot right after each word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpacePlacement;

impl Placement for SpacePlacement {
    fn positions(&self, text: &str) -> Vec<usize> {
        text.chars()
            .enumerate()
            .filter(|&(_, ch)| ch == ' ')
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_by_char_offset() {
        assert_eq!(SpacePlacement.positions("a b  c"), vec![1, 3, 4]);
        // Offsets count chars, not bytes.
        assert_eq!(SpacePlacement.positions("ä ö"), vec![1]);
        assert!(SpacePlacement.positions("nospace").is_empty());
    }

    #[test]
    fn closures_are_policies() {
        let every_other = |text: &str| (0..text.chars().count()).step_by(2).collect::<Vec<_>>();
        assert_eq!(every_other.positions("abcde"), vec![0, 2, 4]);
    }
}
