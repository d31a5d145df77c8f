// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! File access reporting through [`Outcome`] and [`Status`].

use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::outcome::{Event, Outcome, Severity, Status};

const SOURCE: &str = "File";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Read { path: PathBuf, reason: String },
    Write { path: PathBuf, reason: String },
}

impl FileEvent {
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for FileEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, reason } => {
                write!(f, "Could not read file '{}': {reason}", path.display())
            }
            Self::Write { path, reason } => {
                write!(f, "Could not write file '{}': {reason}", path.display())
            }
        }
    }
}

impl From<FileEvent> for Event {
    fn from(event: FileEvent) -> Self {
        Event::new(event.severity(), SOURCE, event.to_string())
    }
}

pub fn read(path: impl AsRef<Path>) -> Outcome<Vec<u8>> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), len = bytes.len(), "read file");
            Outcome::success(bytes)
        }
        Err(e) => Outcome::error(FileEvent::Read { path: path.to_path_buf(), reason: e.to_string() }),
    }
}

pub fn write(path: impl AsRef<Path>, bytes: &[u8]) -> Status {
    let path = path.as_ref();
    match fs::write(path, bytes) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), len = bytes.len(), "wrote file");
            Status::success()
        }
        Err(e) => Status::from(Event::from(FileEvent::Write { path: path.to_path_buf(), reason: e.to_string() })),
    }
}
