//! Formatting strategies for calendar events.
//!
//! Every feed publishes summaries in its own convention. Each [`Formatter`]
//! variant knows one convention and turns a summary into the common
//! [`FormattedRecord`] shape:
//!
//! - **Formula1/2/3**: `"<event> - <session>"` summaries
//! - **IndyCar**: a fixed five character prefix before the event name
//! - **MotoGP**: `"MOTOGP: <event> (<session>)"` summaries
//! - **Space**: launch feeds, summary used as-is
//! - **Default**: category taken from the source name
//!
//! Strategies never fail. When the expected separator is missing they fall
//! back to the whole summary.
//!
//! # Example
//!
//! ```rust
//! use evsync_core::{EventSource, Formatter};
//! use url::Url;
//!
//! let source = EventSource::new(
//!     "MotoGP",
//!     Url::parse("https://example.com/motogp.ics").unwrap(),
//!     Formatter::MotoGp,
//! );
//! let record = source
//!     .formatter
//!     .format(&source, "MOTOGP: Qatar Grand Prix (Race)", "2099-03-10 17:00");
//! assert_eq!(record.subject, "Qatar Grand Prix");
//! assert_eq!(record.qualifier, "Race");
//! ```


use std::sync::LazyLock;

use regex::Regex;

use crate::record::FormattedRecord;
use crate::source::EventSource;

const SESSION_SEPARATOR: &str = " - ";
const NO_SESSION: &str = "NA";

const F1_PREFIX: &str = "FORMULA 1 ";
const F2_PREFIX: &str = "FIA FORMULA 2: The Championship ";
const F3_PREFIX: &str = "FIA FORMULA 3: The Championship ";
const MOTOGP_PREFIX: &str = "MOTOGP: ";
const INDYCAR_PREFIX_LEN: usize = 5;

const F1_QUALI_TAGS: &str = "quali qualy f1quali f1qualy qualifying f1qualifying";
const F1_RACE_TAGS: &str = "race f1race";
const SPACEX_TAGS: &str = "spacex";

static GRAND_PRIX_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"GRAND PRIX \d{4}").expect("grand prix regex should be valid"));

/// The closed set of formatting strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatter {
    /// Formula 1 calendar (`f1Formatter`).
    Formula1,
    /// Formula 2 calendar (`f2Formatter`).
    Formula2,
    /// Formula 3 calendar (`f3Formatter`).
    Formula3,
    /// IndyCar calendar (`indyCarFormatter`).
    IndyCar,
    /// MotoGP calendar (`motoGPFormatter`).
    MotoGp,
    /// Rocket launch calendar (`spaceFormatter`).
    Space,
    /// Anything else (`defaultFormatter`).
    Default,
}

impl Formatter {
    /// Every formatter, in declaration order.
    pub const ALL: [Formatter; 7] = [
        Self::Formula1,
        Self::Formula2,
        Self::Formula3,
        Self::IndyCar,
        Self::MotoGp,
        Self::Space,
        Self::Default,
    ];

    /// Returns the configuration key for this formatter.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Formula1 => "f1Formatter",
            Self::Formula2 => "f2Formatter",
            Self::Formula3 => "f3Formatter",
            Self::IndyCar => "indyCarFormatter",
            Self::MotoGp => "motoGPFormatter",
            Self::Space => "spaceFormatter",
            Self::Default => "defaultFormatter",
        }
    }

    /// Looks up a formatter by its configuration key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Formats one event summary for `source`.
    ///
    /// `summary` must already be comma-free. Tag augmentation works on a copy
    /// of the source tags; `source` itself is never modified.
    pub fn format(&self, source: &EventSource, summary: &str, display_time: &str) -> FormattedRecord {
        match self {
            Self::Formula1 => formula_one(source, summary, display_time),
            Self::Formula2 => championship("Formula 2", F2_PREFIX, source, summary, display_time),
            Self::Formula3 => championship("Formula 3", F3_PREFIX, source, summary, display_time),
            Self::IndyCar => indycar(source, summary, display_time),
            Self::MotoGp => motogp(source, summary, display_time),
            Self::Space => space(source, summary, display_time),
            Self::Default => fallback(source, summary, display_time),
        }
    }
}

fn formula_one(source: &EventSource, summary: &str, display_time: &str) -> FormattedRecord {
    let lower = summary.to_lowercase();
    let mut tags = source.tags.clone();
    if lower.contains("quali") {
        append_tags(&mut tags, F1_QUALI_TAGS);
    }
    if lower.contains("race") {
        append_tags(&mut tags, F1_RACE_TAGS);
    }

    let (subject, qualifier) = match split_session(summary) {
        Some((event, session)) => {
            let event = event.replace(F1_PREFIX, "");
            let event = GRAND_PRIX_YEAR.replace_all(&event, "GP");
            (tidy(&event), tidy(session))
        }
        None => (summary.to_string(), NO_SESSION.to_string()),
    };

    record("Formula 1", subject, qualifier, display_time, source, tags)
}

/// Formula 2 and Formula 3 share one convention, only the prefix differs.
fn championship(
    category: &str,
    prefix: &str,
    source: &EventSource,
    summary: &str,
    display_time: &str,
) -> FormattedRecord {
    let (subject, qualifier) = match split_session(summary) {
        Some((event, session)) => (tidy(&event.replace(prefix, "")), tidy(session)),
        None => (summary.to_string(), NO_SESSION.to_string()),
    };

    record(category, subject, qualifier, display_time, source, source.tags.clone())
}

fn indycar(source: &EventSource, summary: &str, display_time: &str) -> FormattedRecord {
    let subject = match summary.char_indices().nth(INDYCAR_PREFIX_LEN) {
        Some((offset, _)) => tidy(&summary[offset..]),
        None => summary.to_string(),
    };

    record("IndyCar", subject, "Race".to_string(), display_time, source, source.tags.clone())
}

fn motogp(source: &EventSource, summary: &str, display_time: &str) -> FormattedRecord {
    let mut parts = summary.split('(');
    let event = parts.next().unwrap_or(summary);
    let (subject, qualifier) = match parts.next() {
        Some(session) => (
            tidy(&event.replace(MOTOGP_PREFIX, "")),
            tidy(&session.replace(')', "")),
        ),
        None => (tidy(&summary.replace(MOTOGP_PREFIX, "")), NO_SESSION.to_string()),
    };

    record("MotoGP", subject, qualifier, display_time, source, source.tags.clone())
}

fn space(source: &EventSource, summary: &str, display_time: &str) -> FormattedRecord {
    let mut tags = source.tags.clone();
    if summary.to_lowercase().contains("falcon") {
        append_tags(&mut tags, SPACEX_TAGS);
    }

    record("Space", summary.to_string(), "Launch".to_string(), display_time, source, tags)
}

fn fallback(source: &EventSource, summary: &str, display_time: &str) -> FormattedRecord {
    record(
        &source.name,
        summary.to_string(),
        " ".to_string(),
        display_time,
        source,
        source.tags.clone(),
    )
}

fn record(
    category: &str,
    subject: String,
    qualifier: String,
    display_time: &str,
    source: &EventSource,
    tags: String,
) -> FormattedRecord {
    FormattedRecord {
        category: category.to_string(),
        subject,
        qualifier,
        display_time: display_time.to_string(),
        channel: source.channel.clone(),
        tags,
        notify: source.notify,
    }
}

/// Splits `"<event> - <session>"`. Segments past the second are dropped.
fn split_session(summary: &str) -> Option<(&str, &str)> {
    let mut parts = summary.split(SESSION_SEPARATOR);
    let event = parts.next()?;
    let session = parts.next()?;
    Some((event, session))
}

/// Trims whitespace and non-ASCII decoration from both ends.
fn tidy(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || !c.is_ascii())
        .to_string()
}

fn append_tags(tags: &mut String, extra: &str) {
    if !tags.is_empty() {
        tags.push(' ');
    }
    tags.push_str(extra);
}
