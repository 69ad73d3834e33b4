//! The flat record line handed to the output sink.

use std::fmt;

/// One formatted output record.
///
/// Renders as `[Category],Subject,Qualifier,DisplayTime,Channel,Tags,Notify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedRecord {
    /// Category shown in brackets (e.g. `Formula 1`).
    pub category: String,
    /// Main subject of the event (e.g. the grand prix name).
    pub subject: String,
    /// Session or type qualifier (e.g. `Race`, `Launch`).
    pub qualifier: String,
    /// Start time rendered with the configured layout.
    pub display_time: String,
    /// Destination channel, passed through.
    pub channel: String,
    /// Space-separated tags, possibly extended by the formatter.
    pub tags: String,
    /// Notification flag, passed through.
    pub notify: bool,
}

impl FormattedRecord {
    /// Returns the record as an ASCII-only output line.
    pub fn to_line(&self) -> String {
        strip_non_ascii(&self.to_string())
    }
}

impl fmt::Display for FormattedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}],{},{},{},{},{},{}",
            self.category,
            self.subject,
            self.qualifier,
            self.display_time,
            self.channel,
            self.tags,
            self.notify
        )
    }
}

/// Removes every non-ASCII character from `input`.
pub fn strip_non_ascii(input: &str) -> String {
    input.chars().filter(char::is_ascii).collect()
}
