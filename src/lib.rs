// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # stegmark-core
//!
//! Hides a byte payload (a watermark) inside a carrier document and gets it
//! back out. Two carrier kinds are supported:
//!
//! - **Text**: the payload is transcoded into invisible whitespace that
//!   replaces plain spaces, framed by separators and repeated as often as
//!   the text allows.
//! - **ZIP**: the payload is stored as an extra field of the first local
//!   file header; the archive stays valid and byte-identical otherwise.
//!
//! Payloads can be wrapped in a self-describing [`record::Record`] (type
//! tag plus optional size, CRC32 and raw-deflate compression) so a reader
//! can validate what it extracted.
//!
//! Every operation reports through [`Outcome`] / [`Status`]: Success,
//! Warning (usable, but read the messages) or Error, with one formatted
//! line per event.
//!
//! # Quick start
//!
//! ```rust
//! use stegmark_core::{Carrier, Watermark, Watermarker};
//!
//! let watermarker = Watermarker::default();
//! let mut carrier = watermarker
//!     .parse_carrier(b"the quick brown fox jumps over the lazy dog again and again", "txt")
//!     .into_result()
//!     .unwrap();
//!
//! let status = watermarker.add_watermark(&mut carrier, &Watermark::from("me"));
//! assert!(status.is_success());
//!
//! let found = watermarker.get_watermarks(&carrier, true, false).into_result().unwrap();
//! assert_eq!(found, vec![Watermark::from("me")]);
//! ```

pub mod binary;
pub mod carrier;
pub mod file;
pub mod outcome;
pub mod record;
pub mod text;
pub mod watermark;
pub mod watermarker;
pub mod zip;

pub use carrier::{Carrier, CarrierEvent, FileType, FileTypeRegistry};
pub use file::FileEvent;
pub use outcome::{Event, Outcome, Severity, Status};
pub use record::{most_frequent, Record, RecordBuilder, RecordEvent, Registry, Variant};
pub use text::{SeparatorStrategy, TextEvent, TextWatermarker, TextWatermarkerBuilder, Transcoding};
pub use watermark::{Watermark, WatermarkEvent};
pub use watermarker::Watermarker;
pub use zip::{ExtraField, LocalFileHeader, ZipEvent, ZipFile, ZipWatermarker, WATERMARK_FIELD_ID};
