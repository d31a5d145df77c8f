// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Text watermarking with invisible whitespace.
//!
//! The watermark bytes are transcoded into four look-alike space characters
//! ([`transcoding`]), framed by separators ([`separator`]) and written into
//! the slots chosen by a [`placement`] policy, replacing the plain space each
//! slot holds. The whole framed occurrence is repeated as often as it fits so
//! that a truncated copy of the text still carries a complete watermark.
//!
//! Extraction walks the same slots, collects framed runs and decodes each
//! one. Removal writes plain spaces back, which restores the original text.

mod error;
pub mod placement;
pub mod separator;
pub mod transcoding;

pub use error::TextEvent;
pub use placement::{Placement, SpacePlacement};
pub use separator::{SeparatorStrategy, DEFAULT_SEPARATOR};
pub use transcoding::{DecodeStream, Transcoding, TranscodingEvent, DEFAULT_ALPHABET};

use core::fmt;
use std::sync::Arc;

use crate::outcome::{Outcome, Status};
use crate::watermark::{self, Watermark};
use separator::Boundary;

/// Result of a successful insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    /// The marked carrier.
    pub text: String,
    /// Character offset of the opening separator of every complete
    /// occurrence. Empty when only a partial occurrence fit.
    pub offsets: Vec<usize>,
}

/// Result of a removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// The carrier with every watermark character replaced by a plain space.
    pub text: String,
    /// What was found before removing.
    pub watermarks: Vec<Watermark>,
}

/// Adds, finds and removes watermarks in plain text.
#[derive(Clone)]
pub struct TextWatermarker {
    transcoding: Transcoding,
    separators: SeparatorStrategy,
    placement: Arc<dyn Placement + Send + Sync>,
}

impl Default for TextWatermarker {
    fn default() -> Self {
        Self {
            transcoding: Transcoding::default(),
            separators: SeparatorStrategy::default(),
            placement: Arc::new(SpacePlacement),
        }
    }
}

impl fmt::Debug for TextWatermarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextWatermarker")
            .field("transcoding", &self.transcoding)
            .field("separators", &self.separators)
            .finish_non_exhaustive()
    }
}

/// A framed run of watermark characters found while scanning.
struct Run {
    start: usize,
    complete: bool,
    slots: Vec<usize>,
    symbols: Vec<char>,
}

impl Run {
    fn open(slot: usize) -> Self {
        Self { start: slot, complete: false, slots: vec![slot], symbols: Vec::new() }
    }
}

#[derive(Default)]
struct Scan {
    runs: Vec<Run>,
    /// Watermark characters outside any non-empty run.
    stray: Vec<usize>,
}

impl Scan {
    fn finish(&mut self, mut run: Run, complete: bool) {
        if run.symbols.is_empty() {
            self.stray.append(&mut run.slots);
        } else {
            run.complete = complete;
            self.runs.push(run);
        }
    }
}

impl TextWatermarker {
    pub fn builder() -> TextWatermarkerBuilder {
        TextWatermarkerBuilder::default()
    }

    pub fn transcoding(&self) -> &Transcoding {
        &self.transcoding
    }

    pub fn separators(&self) -> &SeparatorStrategy {
        &self.separators
    }

    /// Whether `ch` belongs to the alphabet or is a separator.
    pub fn is_marker(&self, ch: char) -> bool {
        self.transcoding.contains(ch) || self.separators.contains(ch)
    }

    /// Slots of `chars`, computed on a view where every marker reads as a
    /// plain space. Sorted, deduplicated and in range. Offsets the policy
    /// returns that do not hold a plain space in that view are dropped, so
    /// carrier content is never overwritten.
    fn slots(&self, chars: &[char]) -> Vec<usize> {
        let view: Vec<char> = chars
            .iter()
            .map(|&ch| if self.is_marker(ch) { ' ' } else { ch })
            .collect();
        let mut slots = self.placement.positions(&view.iter().collect::<String>());
        slots.retain(|&slot| view.get(slot) == Some(&' '));
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    /// Number of slots available in `text`.
    pub fn capacity(&self, text: &str) -> usize {
        let chars: Vec<char> = text.chars().collect();
        self.slots(&chars).len()
    }

    /// Insert `watermark` into `text`, repeated as often as it fits.
    ///
    /// Fails if `text` already contains marker characters or offers no slot.
    /// If not even one occurrence fits, the leading part is inserted and a
    /// Warning reports `(required, inserted)`.
    pub fn add_watermark(&self, text: &str, watermark: &Watermark) -> Outcome<Embedding> {
        let mut chars: Vec<char> = text.chars().collect();
        if let Some(offset) = chars.iter().position(|&ch| self.is_marker(ch)) {
            return Outcome::error(TextEvent::ContainsMarkerChars { offset });
        }

        let encoded = self.transcoding.encode(watermark.as_bytes());
        let slots = self.slots(&chars);
        let required = self.separators.required(encoded.len());
        let repeats = self.separators.repeats(encoded.len(), slots.len());
        tracing::debug!(slots = slots.len(), required, repeats, "placing text watermark");

        if slots.is_empty() {
            return Outcome::error(TextEvent::InsufficientPositions { required, available: 0 });
        }

        let mut status = Status::success();
        let (stream, offsets) = if repeats == 0 {
            let mut stream = self.separators.frame(&encoded, 1);
            stream.truncate(slots.len());
            tracing::warn!(required, inserted = slots.len(), "watermark inserted partially");
            status.add_event(TextEvent::OversizedWatermark { required, inserted: slots.len() });
            (stream, Vec::new())
        } else {
            let stride = self.separators.stride(encoded.len());
            let offsets = (0..repeats).map(|i| slots[i * stride]).collect();
            (self.separators.frame(&encoded, repeats), offsets)
        };

        for (&slot, ch) in slots.iter().zip(stream) {
            chars[slot] = ch;
        }
        status.into_outcome(Embedding { text: chars.into_iter().collect(), offsets })
    }

    fn scan(&self, chars: &[char]) -> Scan {
        let mut scan = Scan::default();
        let mut current: Option<Run> = None;

        for slot in self.slots(chars) {
            let ch = chars[slot];
            match self.separators.boundary(ch) {
                Some(Boundary::Both) => {
                    if let Some(run) = current.take() {
                        scan.finish(run, true);
                    }
                    current = Some(Run::open(slot));
                }
                Some(Boundary::Start) => {
                    if let Some(run) = current.take() {
                        scan.finish(run, false);
                    }
                    current = Some(Run::open(slot));
                }
                Some(Boundary::End) => match current.take() {
                    Some(mut run) => {
                        run.slots.push(slot);
                        scan.finish(run, true);
                    }
                    None => scan.stray.push(slot),
                },
                None if self.transcoding.contains(ch) => match current.as_mut() {
                    Some(run) => {
                        run.slots.push(slot);
                        run.symbols.push(ch);
                    }
                    None => scan.stray.push(slot),
                },
                None => {
                    if let Some(run) = current.take() {
                        scan.finish(run, false);
                    }
                }
            }
        }
        if let Some(run) = current.take() {
            // A trailing single separator opens an empty run, which `finish` drops.
            scan.finish(run, false);
        }
        scan
    }

    /// Decode every run. Returns the watermarks (always present) and every
    /// slot holding a marker character.
    fn extract(&self, chars: &[char]) -> (Outcome<Vec<Watermark>>, Vec<usize>) {
        let scan = self.scan(chars);
        let mut status = Status::success();
        let mut watermarks = Vec::with_capacity(scan.runs.len());
        let mut marked = scan.stray;

        for run in scan.runs {
            if !run.complete {
                tracing::warn!(offset = run.start, "incomplete watermark run");
                status.add_event(TextEvent::IncompleteWatermark { offset: run.start });
            }
            let (decode_status, bytes) = self.transcoding.decode(run.symbols.iter().copied()).into_parts();
            status.append(decode_status);
            if let Some(bytes) = bytes {
                if run.complete || !bytes.is_empty() {
                    watermarks.push(Watermark::new(bytes));
                }
            }
            marked.extend(run.slots);
        }
        (status.into_outcome(watermarks), marked)
    }

    /// Extract all watermarks from `text`.
    ///
    /// `squash` drops duplicates, `single_watermark` keeps only the most
    /// frequent content. Problems with one run never stop the scan.
    pub fn get_watermarks(&self, text: &str, squash: bool, single_watermark: bool) -> Outcome<Vec<Watermark>> {
        let chars: Vec<char> = text.chars().collect();
        let (outcome, _) = self.extract(&chars);
        let (mut status, watermarks) = outcome.into_parts();
        let (select_status, selected) =
            watermark::select(watermarks.unwrap_or_default(), squash, single_watermark).into_parts();
        status.append(select_status);
        Outcome::new(status, selected)
    }

    /// Extract all watermarks and replace their characters with plain spaces.
    pub fn remove_watermarks(&self, text: &str) -> Outcome<Removal> {
        let mut chars: Vec<char> = text.chars().collect();
        let (outcome, marked) = self.extract(&chars);
        let (mut status, watermarks) = outcome.into_parts();
        for slot in marked {
            chars[slot] = ' ';
        }
        if !status.is_success() {
            tracing::warn!("removing watermarks despite extraction problems");
            status.add_event_with(TextEvent::RemovedDespiteProblems, true);
        }
        status.into_outcome(Removal {
            text: chars.into_iter().collect(),
            watermarks: watermarks.unwrap_or_default(),
        })
    }

    /// Whether any slot of `text` holds a marker character. Nothing is decoded.
    pub fn contains_watermark(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        self.slots(&chars).into_iter().any(|slot| self.is_marker(chars[slot]))
    }
}

/// Configures a [`TextWatermarker`].
#[derive(Clone)]
pub struct TextWatermarkerBuilder {
    alphabet: [char; 4],
    separators: SeparatorStrategy,
    placement: Arc<dyn Placement + Send + Sync>,
}

impl Default for TextWatermarkerBuilder {
    fn default() -> Self {
        Self {
            alphabet: DEFAULT_ALPHABET,
            separators: SeparatorStrategy::default(),
            placement: Arc::new(SpacePlacement),
        }
    }
}

impl TextWatermarkerBuilder {
    pub fn alphabet(mut self, alphabet: [char; 4]) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn separators(mut self, separators: SeparatorStrategy) -> Self {
        self.separators = separators;
        self
    }

    pub fn placement<P>(mut self, placement: P) -> Self
    where
        P: Placement + Send + Sync + 'static,
    {
        self.placement = Arc::new(placement);
        self
    }

    /// Validate the configuration. Every problem is reported, not just the first.
    pub fn build(self) -> Outcome<TextWatermarker> {
        let (mut status, transcoding) = Transcoding::new(self.alphabet).into_parts();
        let separator_chars = self.separators.chars();

        if self.alphabet.contains(&' ') || separator_chars.contains(&' ') {
            status.add_event(TextEvent::SpaceAsMarker);
        }
        if let SeparatorStrategy::StartEnd { start, end } = self.separators {
            if start == end {
                status.add_event(TextEvent::IdenticalSeparators(start));
            }
        }
        for &sep in &separator_chars {
            if self.alphabet.contains(&sep) {
                status.add_event(TextEvent::SeparatorCollision(sep));
            }
        }

        match transcoding {
            Some(transcoding) if !status.is_error() => status.into_outcome(TextWatermarker {
                transcoding,
                separators: self.separators,
                placement: self.placement,
            }),
            _ => status.into_empty(),
        }
    }
}
