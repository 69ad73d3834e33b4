//! Streaming ICS decoding.
//!
//! [`FeedDecoder`] reads a feed body line by line and hands out one VEVENT at
//! a time, so a feed is never held in memory as a whole and one broken event
//! does not spoil the rest. Each collected block is parsed with `icalendar`.

use chrono::{TimeZone, Utc};
use futures_util::{Stream, StreamExt};
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, Event,
};
use tracing::trace;

use crate::error::{DecodeError, DecodeResult, ProviderResult};
use crate::raw_event::{RawEvent, RawEventTime};

const BEGIN_EVENT: &str = "BEGIN:VEVENT";

/// Lazily decodes VEVENTs from a byte stream.
pub struct FeedDecoder<S> {
    stream: S,
    buffer: Vec<u8>,
    /// Bytes of `buffer` already handed out as lines.
    consumed: usize,
    block: Option<EventBlock>,
    finished: bool,
}

impl<S> FeedDecoder<S>
where
    S: Stream<Item = ProviderResult<Vec<u8>>> + Unpin,
{
    /// Creates a decoder over a feed body.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            consumed: 0,
            block: None,
            finished: false,
        }
    }

    /// Decodes the next event.
    ///
    /// Returns `None` at end of stream. An `Err` concerns one item only;
    /// callers keep pulling until `None`.
    pub async fn next_event(&mut self) -> Option<DecodeResult<RawEvent>> {
        loop {
            while let Some(line) = self.next_line() {
                if let Some(item) = self.push_line(&line) {
                    return Some(item);
                }
            }

            if self.finished {
                return self.block.take().map(|_| Err(DecodeError::Truncated));
            }

            match self.stream.next().await {
                Some(Ok(chunk)) => {
                    self.buffer.drain(..self.consumed);
                    self.consumed = 0;
                    self.buffer.extend_from_slice(&chunk);
                }
                Some(Err(err)) => {
                    self.finished = true;
                    self.block = None;
                    self.buffer.clear();
                    self.consumed = 0;
                    return Some(Err(DecodeError::Interrupted(err)));
                }
                None => self.finished = true,
            }
        }
    }

    /// Takes the next complete line out of the buffer.
    ///
    /// Once the stream is finished, a trailing line without terminator is
    /// returned as well.
    fn next_line(&mut self) -> Option<String> {
        let pending = &self.buffer[self.consumed..];
        let end = match pending.iter().position(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None if self.finished && !pending.is_empty() => pending.len(),
            None => return None,
        };

        let line = String::from_utf8_lossy(&pending[..end])
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.consumed += end;
        Some(line)
    }

    fn push_line(&mut self, line: &str) -> Option<DecodeResult<RawEvent>> {
        if self.block.is_none() {
            if line.trim_end().eq_ignore_ascii_case(BEGIN_EVENT) {
                self.block = Some(EventBlock::new(line));
            }
            return None;
        }

        let closed = self.block.as_mut()?.push(line);
        if closed {
            return self.block.take().map(EventBlock::parse);
        }
        None
    }
}

/// The lines of one VEVENT, nested components included.
struct EventBlock {
    lines: Vec<String>,
    depth: usize,
}

impl EventBlock {
    fn new(begin: &str) -> Self {
        Self {
            lines: vec![begin.to_string()],
            depth: 0,
        }
    }

    /// Adds a line; returns true once the VEVENT is closed.
    fn push(&mut self, line: &str) -> bool {
        self.lines.push(line.to_string());
        if starts_with_ignore_case(line, "BEGIN:") {
            self.depth += 1;
        } else if starts_with_ignore_case(line, "END:") {
            if self.depth == 0 {
                return true;
            }
            self.depth -= 1;
        }
        false
    }

    fn parse(self) -> DecodeResult<RawEvent> {
        let mut ics = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n");
        for line in &self.lines {
            ics.push_str(line);
            ics.push_str("\r\n");
        }
        ics.push_str("END:VCALENDAR\r\n");

        let calendar = ics
            .parse::<Calendar>()
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        calendar
            .iter()
            .find_map(|component| match component {
                CalendarComponent::Event(event) => Some(convert_event(event)),
                _ => None,
            })
            .ok_or_else(|| DecodeError::Malformed("block holds no event".to_string()))
    }
}

fn convert_event(event: &Event) -> RawEvent {
    let mut raw = RawEvent::new();

    if let Some(uid) = event.get_uid() {
        raw = raw.with_uid(uid);
    }
    if let Some(start) = event.get_start() {
        raw = raw.with_start(convert_date_time(start));
    }
    if let Some(summary) = event.get_summary() {
        raw = raw.with_summary(summary);
    }

    trace!(uid = ?raw.uid, summary = ?raw.summary, start = ?raw.start, "Decoded event");
    raw
}

fn convert_date_time(dt: DatePerhapsTime) -> RawEventTime {
    match dt {
        DatePerhapsTime::Date(date) => RawEventTime::Date(date),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => RawEventTime::Utc(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => {
            RawEventTime::Floating(naive)
        }
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            if tzid.eq_ignore_ascii_case("UTC") {
                RawEventTime::Utc(Utc.from_utc_datetime(&date_time))
            } else {
                RawEventTime::Zoned { date_time, tzid }
            }
        }
    }
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
