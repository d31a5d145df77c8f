// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Unified outcome model shared by every component.
//!
//! Operations report through a [`Status`]: an ordered list of [`Event`]s
//! plus an overall [`Severity`]. An [`Outcome`] is a `Status` that may carry
//! a value. Warnings mean "usable, but look at the messages"; errors mean the
//! value (if any) should not be trusted.
//!
//! Formatting is stable and relied upon by callers:
//!
//! ```text
//! <Severity> (<source>): <message>
//! ```
//!
//! with one line per stored event.

use core::fmt;

/// Ordered severity. Merging two statuses keeps the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single reported fact: severity, originating component and an optional
/// explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    severity: Severity,
    source: &'static str,
    message: Option<String>,
}

impl Event {
    /// Create an event with an explanation.
    pub fn new(severity: Severity, source: &'static str, message: impl Into<String>) -> Self {
        Self { severity, source, message: Some(message.into()) }
    }

    /// A bare success event. It only reports a severity and is never stored.
    pub fn success(source: &'static str) -> Self {
        Self { severity: Severity::Success, source, message: None }
    }

    pub fn warning(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, source, message)
    }

    pub fn error(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, source, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} ({}): {}", self.severity, self.source, message),
            None => write!(f, "{} ({})", self.severity, self.source),
        }
    }
}

/// Accumulated events with an overall severity.
///
/// Invariant: `severity()` is at least the severity of every stored event and
/// equals the maximum unless an override was requested while merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    severity: Severity,
    events: Vec<Event>,
}

impl Status {
    /// An empty successful status.
    pub fn success() -> Self {
        Self::default()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Stored events in report order. Events without a message are not kept.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_success(&self) -> bool {
        self.severity == Severity::Success
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Attach an event, raising the overall severity to the maximum.
    pub fn add_event(&mut self, event: impl Into<Event>) {
        self.add_event_with(event, false);
    }

    /// Attach an event. With `override_severity` the status takes the event's
    /// severity even if that lowers it.
    pub fn add_event_with(&mut self, event: impl Into<Event>, override_severity: bool) {
        let event = event.into();
        self.severity = if override_severity {
            event.severity
        } else {
            self.severity.max(event.severity)
        };
        if event.message.is_some() {
            self.events.push(event);
        }
    }

    /// Append `other`'s events after ours.
    pub fn append(&mut self, other: Status) {
        self.append_with(other, false);
    }

    /// Append `other`'s events after ours. With `override_severity` the
    /// resulting severity is `other`'s.
    pub fn append_with(&mut self, other: Status, override_severity: bool) {
        self.severity = merged(self.severity, other.severity, override_severity);
        self.events.extend(other.events);
    }

    /// Insert `other`'s events before ours.
    pub fn prepend(&mut self, other: Status) {
        self.prepend_with(other, false);
    }

    /// Insert `other`'s events before ours. With `override_severity` the
    /// resulting severity is `other`'s.
    pub fn prepend_with(&mut self, other: Status, override_severity: bool) {
        self.severity = merged(self.severity, other.severity, override_severity);
        let mut events = other.events;
        events.append(&mut self.events);
        self.events = events;
    }

    /// Project this status onto a value.
    pub fn into_outcome<T>(self, value: T) -> Outcome<T> {
        Outcome { status: self, value: Some(value) }
    }

    /// Project this status onto "no value"; used for errors.
    pub fn into_empty<T>(self) -> Outcome<T> {
        Outcome { status: self, value: None }
    }

    /// All stored events joined by newlines, or the bare severity when no
    /// event was stored.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

fn merged(current: Severity, other: Severity, override_severity: bool) -> Severity {
    if override_severity {
        other
    } else {
        current.max(other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.events.is_empty() {
            return write!(f, "{}", self.severity);
        }
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{event}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Status {}

impl From<Event> for Status {
    fn from(event: Event) -> Self {
        let mut status = Status::success();
        status.add_event(event);
        status
    }
}

/// A [`Status`] with an optional value.
///
/// A value is expected whenever the status is Success or Warning. An Error
/// outcome normally carries none, although constructing one with a value is
/// allowed (for example a partial extraction that still wants to hand back
/// what it found).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    status: Status,
    value: Option<T>,
}

impl<T> Outcome<T> {
    pub fn new(status: Status, value: Option<T>) -> Self {
        Self { status, value }
    }

    /// A successful outcome with no events.
    pub fn success(value: T) -> Self {
        Status::success().into_outcome(value)
    }

    /// A failed outcome carrying a single event.
    pub fn error(event: impl Into<Event>) -> Self {
        Status::from(event.into()).into_empty()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    pub fn severity(&self) -> Severity {
        self.status.severity
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_warning(&self) -> bool {
        self.status.is_warning()
    }

    pub fn is_error(&self) -> bool {
        self.status.is_error()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn into_parts(self) -> (Status, Option<T>) {
        (self.status, self.value)
    }

    /// Replace the value, keeping the status.
    pub fn with_value<U>(self, value: U) -> Outcome<U> {
        Outcome { status: self.status, value: Some(value) }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome { status: self.status, value: self.value.map(f) }
    }

    /// Treat Warning as usable and Error as fatal.
    ///
    /// Returns `Err` with the full status when the outcome is an error or has
    /// no value.
    pub fn into_result(self) -> Result<T, Status> {
        match self.value {
            Some(value) if !self.status.is_error() => Ok(value),
            _ => Err(self.status),
        }
    }
}

impl<T> From<Status> for Outcome<T> {
    fn from(status: Status) -> Self {
        status.into_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "Test";

    #[test]
    fn severity_order() {
        assert!(Severity::Success < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn event_format() {
        let event = Event::warning(SRC, "careful");
        assert_eq!(event.to_string(), "Warning (Test): careful");
        assert_eq!(Event::success(SRC).to_string(), "Success (Test)");
    }

    #[test]
    fn bare_success_is_not_stored() {
        let mut status = Status::success();
        status.add_event(Event::success(SRC));
        assert!(status.events().is_empty());
        assert!(status.is_success());
        assert_eq!(status.to_string(), "Success");
    }

    #[test]
    fn severity_escalates_to_max() {
        let mut status = Status::success();
        status.add_event(Event::error(SRC, "broken"));
        status.add_event(Event::warning(SRC, "odd"));
        assert!(status.is_error());
        assert_eq!(status.events().len(), 2);
        assert_eq!(status.to_string(), "Error (Test): broken\nWarning (Test): odd");
    }

    #[test]
    fn override_lowers_severity() {
        let mut status = Status::from(Event::error(SRC, "broken"));
        status.add_event_with(Event::warning(SRC, "recovered"), true);
        assert!(status.is_warning());
        assert_eq!(status.events().len(), 2);
    }

    #[test]
    fn append_and_prepend_order() {
        let mut first = Status::from(Event::warning("A", "one"));
        let second = Status::from(Event::error("B", "two"));
        first.append(second.clone());
        assert_eq!(first.to_string(), "Warning (A): one\nError (B): two");
        assert!(first.is_error());

        let mut third = Status::from(Event::warning("A", "one"));
        third.prepend(second);
        assert_eq!(third.to_string(), "Error (B): two\nWarning (A): one");
        assert!(third.is_error());
    }

    #[test]
    fn append_with_override_takes_other_severity() {
        let mut status = Status::from(Event::error(SRC, "broken"));
        status.append_with(Status::success(), true);
        assert!(status.is_success());
        assert_eq!(status.events().len(), 1);
    }

    #[test]
    fn outcome_into_result() {
        let ok: Outcome<u8> = Outcome::success(1);
        assert_eq!(ok.into_result(), Ok(1));

        let mut warned = Outcome::success(2u8);
        warned.status_mut().add_event(Event::warning(SRC, "meh"));
        assert_eq!(warned.into_result(), Ok(2));

        let failed: Outcome<u8> = Outcome::error(Event::error(SRC, "nope"));
        let err = failed.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Error (Test): nope");

        let discouraged = Outcome::new(Status::from(Event::error(SRC, "bad")), Some(3u8));
        assert!(discouraged.value().is_some());
        assert!(discouraged.into_result().is_err());
    }
}
