// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier documents and the extension lookup that picks their kind.

use core::fmt;
use std::collections::HashMap;

use crate::outcome::{Event, Outcome, Severity};
use crate::zip::ZipFile;

const SOURCE: &str = "Carrier";

/// Kinds of carrier the crate knows how to watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Text,
    Zip,
}

/// A document hosting (or about to host) a watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Carrier {
    Text(String),
    Zip(ZipFile),
}

impl Carrier {
    /// Parse `bytes` as a carrier of `file_type`.
    ///
    /// Text must be valid UTF-8; there is no partial decode of the carrier.
    pub fn from_bytes(bytes: &[u8], file_type: FileType) -> Outcome<Self> {
        match file_type {
            FileType::Text => match core::str::from_utf8(bytes) {
                Ok(text) => Outcome::success(Self::Text(text.to_string())),
                Err(e) => Outcome::error(CarrierEvent::InvalidText { offset: e.valid_up_to() }),
            },
            FileType::Zip => ZipFile::parse(bytes).map(Self::Zip),
        }
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Self::Text(_) => FileType::Text,
            Self::Zip(_) => FileType::Zip,
        }
    }

    /// Serialise back to bytes. An unmodified carrier reproduces its input.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(text) => text.as_bytes().to_vec(),
            Self::Zip(file) => file.to_bytes(),
        }
    }
}

/// Conditions raised while resolving or parsing carriers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierEvent {
    /// The text carrier is not valid UTF-8.
    InvalidText { offset: usize },
    /// No file type is registered for the extension.
    UnsupportedExtension(String),
    /// The path has no extension to look up.
    MissingExtension,
}

impl CarrierEvent {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for CarrierEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidText { offset } => {
                write!(f, "The input contains invalid byte(s) at offset {offset}.")
            }
            Self::UnsupportedExtension(ext) => write!(f, "Unsupported file type '{ext}'."),
            Self::MissingExtension => write!(f, "The file name has no extension to detect its type."),
        }
    }
}

impl From<CarrierEvent> for Event {
    fn from(event: CarrierEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}

const TEXT_EXTENSIONS: [&str; 6] = ["txt", "md", "csv", "json", "xml", "html"];
const ZIP_EXTENSIONS: [&str; 9] = ["zip", "jar", "docx", "xlsx", "pptx", "odt", "ods", "odp", "epub"];

/// Maps lowercase file extensions to carrier kinds. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTypeRegistry {
    types: HashMap<String, FileType>,
}

impl Default for FileTypeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for ext in TEXT_EXTENSIONS {
            registry.register(ext, FileType::Text);
        }
        for ext in ZIP_EXTENSIONS {
            registry.register(ext, FileType::Zip);
        }
        registry
    }
}

impl FileTypeRegistry {
    pub fn empty() -> Self {
        Self { types: HashMap::new() }
    }

    /// Map `extension` (case-insensitive, leading dot optional) to
    /// `file_type`, replacing any earlier mapping.
    pub fn register(&mut self, extension: &str, file_type: FileType) -> Option<FileType> {
        self.types.insert(normalize(extension), file_type)
    }

    pub fn get(&self, extension: &str) -> Option<FileType> {
        self.types.get(&normalize(extension)).copied()
    }

    pub fn resolve(&self, extension: &str) -> Outcome<FileType> {
        let ext = normalize(extension);
        if ext.is_empty() {
            return Outcome::error(CarrierEvent::MissingExtension);
        }
        match self.types.get(&ext) {
            Some(&file_type) => Outcome::success(file_type),
            None => Outcome::error(CarrierEvent::UnsupportedExtension(ext)),
        }
    }

    /// Resolve by the extension of `path`.
    pub fn resolve_path(&self, path: &std::path::Path) -> Outcome<FileType> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self.resolve(ext),
            None => Outcome::error(CarrierEvent::MissingExtension),
        }
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}
