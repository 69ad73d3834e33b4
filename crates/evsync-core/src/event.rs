//! Normalized calendar event.

use chrono::DateTime;
use chrono_tz::Tz;

/// An upcoming event, ready for filtering and formatting.
///
/// Lives only while one worker processes one decoded item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Start time in the configured zone.
    pub start: DateTime<Tz>,
    /// Summary on one line, commas stripped.
    pub summary: String,
}

impl CalendarEvent {
    /// Creates an event, stripping commas from `summary`.
    ///
    /// Line breaks and other control characters become spaces: each event
    /// must stay a single output line.
    pub fn new(start: DateTime<Tz>, summary: &str) -> Self {
        let summary = summary
            .chars()
            .filter(|&c| c != ',')
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        Self { start, summary }
    }
}
