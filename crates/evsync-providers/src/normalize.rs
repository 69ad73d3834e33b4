//! RawEvent to CalendarEvent conversion.
//!
//! The normalization process:
//! 1. Resolves the start time into the configured zone
//! 2. Drops events that are not in the future
//! 3. Reads the summary and strips commas from it

use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

use evsync_core::CalendarEvent;

use crate::raw_event::{RawEvent, RawEventTime};

/// Why a decoded event could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The event has no DTSTART.
    #[error("event {uid:?} has no start time")]
    MissingStart {
        /// UID of the event, when present.
        uid: Option<String>,
    },

    /// The start is a local time that cannot be placed on the timeline.
    #[error("event {uid:?} starts at {local} which cannot be resolved in {zone}")]
    UnresolvableStart {
        /// UID of the event, when present.
        uid: Option<String>,
        /// The local wall-clock time.
        local: NaiveDateTime,
        /// The zone it was resolved in.
        zone: String,
    },

    /// The event has no SUMMARY.
    #[error("event {uid:?} has no summary")]
    MissingSummary {
        /// UID of the event, when present.
        uid: Option<String>,
    },
}

/// Converts a [`RawEvent`] to a [`CalendarEvent`] in `tz`.
///
/// Returns `Ok(None)` for events starting at or before `now`; those are
/// dropped without a diagnostic.
///
/// # Errors
///
/// Returns `NormalizeError` when the start or summary is missing or the start
/// cannot be placed on the timeline.
pub fn normalize_event(
    raw: &RawEvent,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<Option<CalendarEvent>, NormalizeError> {
    let start = raw.start.as_ref().ok_or_else(|| NormalizeError::MissingStart {
        uid: raw.uid.clone(),
    })?;
    let start = resolve_start(start, tz).map_err(|(local, zone)| {
        NormalizeError::UnresolvableStart {
            uid: raw.uid.clone(),
            local,
            zone: zone.name().to_string(),
        }
    })?;

    if start <= now {
        return Ok(None);
    }

    let summary = raw
        .summary
        .as_deref()
        .ok_or_else(|| NormalizeError::MissingSummary {
            uid: raw.uid.clone(),
        })?;

    Ok(Some(CalendarEvent::new(start, summary)))
}

/// Places a raw start time on the timeline and shows it in `tz`.
///
/// The error carries the local time and zone that could not be resolved.
fn resolve_start(start: &RawEventTime, tz: Tz) -> Result<DateTime<Tz>, (NaiveDateTime, Tz)> {
    match start {
        RawEventTime::Utc(dt) => Ok(dt.with_timezone(&tz)),
        RawEventTime::Floating(local) => in_zone(*local, tz),
        RawEventTime::Date(date) => in_zone(date.and_time(NaiveTime::MIN), tz),
        RawEventTime::Zoned { date_time, tzid } => {
            let zone = match event_zone(tzid) {
                Some(zone) => zone,
                None => {
                    debug!(tzid = %tzid, fallback = %tz, "Unknown TZID, using configured zone");
                    tz
                }
            };
            in_zone(*date_time, zone).map(|dt| dt.with_timezone(&tz))
        }
    }
}

/// How far back to look for the offset in effect before a DST gap.
const GAP_LOOKBACK: TimeDelta = TimeDelta::hours(3);

/// Resolves a wall-clock time in `zone`.
///
/// Ambiguous times take the earlier instant. Times inside a DST gap keep the
/// offset from before the transition, so 02:30 on a 02:00 to 03:00 jump
/// lands at 03:30.
fn in_zone(local: NaiveDateTime, zone: Tz) -> Result<DateTime<Tz>, (NaiveDateTime, Tz)> {
    zone.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(local - GAP_LOOKBACK))
                .earliest()
                .map(|before| before + GAP_LOOKBACK)
        })
        .ok_or((local, zone))
}

/// Parses a TZID parameter, tolerating quotes and the `/` prefix some
/// publishers use.
fn event_zone(tzid: &str) -> Option<Tz> {
    tzid.trim_matches('"')
        .trim_start_matches('/')
        .parse::<Tz>()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
    }

    fn raw(start: RawEventTime, summary: &str) -> RawEvent {
        RawEvent::new()
            .with_uid("evt@example.com")
            .with_start(start)
            .with_summary(summary)
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn utc_start_is_shown_in_configured_zone() {
        let start = Utc.with_ymd_and_hms(2030, 7, 6, 14, 0, 0).unwrap();
        let event = normalize_event(&raw(RawEventTime::Utc(start), "Race"), Tz::Europe__Paris, now())
            .unwrap()
            .unwrap();
        assert_eq!(event.start.format("%Y-%m-%d %H:%M").to_string(), "2030-07-06 16:00");
        assert_eq!(event.start.timezone(), Tz::Europe__Paris);
    }

    #[test]
    fn floating_start_uses_configured_zone() {
        let event = normalize_event(
            &raw(RawEventTime::Floating(local(2030, 7, 6, 15, 0)), "Race"),
            Tz::America__New_York,
            now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(event.start.format("%H:%M").to_string(), "15:00");
        assert_eq!(
            event.start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2030, 7, 6, 19, 0, 0).unwrap()
        );
    }

    #[test]
    fn zoned_start_is_converted() {
        let start = RawEventTime::Zoned {
            date_time: local(2030, 7, 6, 15, 0),
            tzid: "Europe/London".to_string(),
        };
        let event = normalize_event(&raw(start, "Race"), Tz::UTC, now())
            .unwrap()
            .unwrap();
        assert_eq!(event.start.format("%H:%M").to_string(), "14:00");
    }

    #[test]
    fn unknown_tzid_falls_back_to_configured_zone() {
        let start = RawEventTime::Zoned {
            date_time: local(2030, 7, 6, 15, 0),
            tzid: "Custom Racing Time".to_string(),
        };
        let event = normalize_event(&raw(start, "Race"), Tz::Asia__Tokyo, now())
            .unwrap()
            .unwrap();
        assert_eq!(event.start.format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn all_day_start_is_midnight() {
        let date = NaiveDate::from_ymd_opt(2030, 7, 26).unwrap();
        let event = normalize_event(&raw(RawEventTime::Date(date), "RACE: Indy 500"), Tz::UTC, now())
            .unwrap()
            .unwrap();
        assert_eq!(event.start.format("%Y-%m-%d %H:%M").to_string(), "2030-07-26 00:00");
    }

    #[test]
    fn past_events_are_dropped() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let result = normalize_event(&raw(RawEventTime::Utc(start), "Old"), Tz::UTC, now());
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn event_starting_now_is_dropped() {
        let result = normalize_event(&raw(RawEventTime::Utc(now()), "Now"), Tz::UTC, now());
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn past_event_without_summary_is_silently_dropped() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let raw = RawEvent::new().with_start(RawEventTime::Utc(start));
        assert_eq!(normalize_event(&raw, Tz::UTC, now()), Ok(None));
    }

    #[test]
    fn missing_summary_is_an_error() {
        let start = Utc.with_ymd_and_hms(2030, 7, 6, 14, 0, 0).unwrap();
        let raw = RawEvent::new().with_uid("x").with_start(RawEventTime::Utc(start));
        let err = normalize_event(&raw, Tz::UTC, now()).unwrap_err();
        assert_eq!(err, NormalizeError::MissingSummary { uid: Some("x".to_string()) });
    }

    #[test]
    fn missing_start_is_an_error() {
        let raw = RawEvent::new().with_summary("TBD");
        let err = normalize_event(&raw, Tz::UTC, now()).unwrap_err();
        assert_eq!(err, NormalizeError::MissingStart { uid: None });
    }

    #[test]
    fn start_in_dst_gap_keeps_pre_gap_offset() {
        // Clocks in Paris jump from 02:00 to 03:00 on 2031-03-30.
        let start = RawEventTime::Zoned {
            date_time: local(2031, 3, 30, 2, 30),
            tzid: "Europe/Paris".to_string(),
        };
        let event = normalize_event(&raw(start, "Gap"), Tz::Europe__Paris, now())
            .unwrap()
            .unwrap();
        assert_eq!(event.start.format("%Y-%m-%d %H:%M").to_string(), "2031-03-30 03:30");
        assert_eq!(
            event.start.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2031, 3, 30, 1, 30, 0).unwrap()
        );
    }

    #[test]
    fn all_day_start_at_midnight_gap_is_kept() {
        // Santiago skips from 00:00 to 01:00 on 2030-09-08.
        let date = NaiveDate::from_ymd_opt(2030, 9, 8).unwrap();
        let event = normalize_event(
            &raw(RawEventTime::Date(date), "Fiestas Patrias"),
            Tz::America__Santiago,
            now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(event.start.format("%Y-%m-%d %H:%M").to_string(), "2030-09-08 01:00");
    }

    #[test]
    fn summary_commas_are_stripped() {
        let start = Utc.with_ymd_and_hms(2030, 7, 6, 14, 0, 0).unwrap();
        let event = normalize_event(
            &raw(RawEventTime::Utc(start), "Falcon 9, Starlink Group 6-1"),
            Tz::UTC,
            now(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(event.summary, "Falcon 9 Starlink Group 6-1");
    }

    #[test]
    fn tzid_quirks_are_tolerated() {
        assert_eq!(event_zone("\"Europe/Berlin\""), Some(Tz::Europe__Berlin));
        assert_eq!(event_zone("/Europe/Berlin"), Some(Tz::Europe__Berlin));
        assert_eq!(event_zone("Nowhere"), None);
    }
}
