//! Raw event type, as decoded from a feed before normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// The start time of a raw event, as written in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEventTime {
    /// A UTC datetime (`...Z`).
    Utc(DateTime<Utc>),
    /// A floating local datetime, no zone attached.
    Floating(NaiveDateTime),
    /// A local datetime with a `TZID` parameter.
    Zoned {
        /// The local wall-clock time.
        date_time: NaiveDateTime,
        /// The `TZID` as written in the feed.
        tzid: String,
    },
    /// A date without a time (all-day event).
    Date(NaiveDate),
}

/// One decoded VEVENT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEvent {
    /// The event UID, if present.
    pub uid: Option<String>,
    /// The event start, if present.
    pub start: Option<RawEventTime>,
    /// The unescaped summary, if present.
    pub summary: Option<String>,
}

impl RawEvent {
    /// Creates an event with no properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Builder method to set the start time.
    pub fn with_start(mut self, start: RawEventTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}
