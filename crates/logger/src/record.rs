//! Log record type

use std::borrow::Cow;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::Level;

/// A single log record.
///
/// Built per emitted call, handed to the formatter, then discarded.
/// Message and context borrow where they can so split-mode emission
/// does not copy each line.
#[derive(Debug, Clone, Serialize)]
pub struct Record<'a> {
    /// Log level
    pub level: Level,
    /// When the record was created
    pub timestamp: DateTime<Local>,
    /// Resolved context label, if any
    pub context: Option<Cow<'a, str>>,
    /// The log message
    pub message: Cow<'a, str>,
    /// Call-site file
    pub file: Option<&'static str>,
    /// Call-site line number
    pub line: Option<u32>,
}

impl<'a> Record<'a> {
    /// Create a new record with the current local time.
    #[inline]
    pub fn new(level: Level, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            context: None,
            message: message.into(),
            file: None,
            line: None,
        }
    }

    /// Builder-style method for setting the context label
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Builder-style method for setting the call site
    #[inline]
    #[must_use]
    pub fn with_location(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }
}
