//! Feed fetching, streaming ICS decoding and event normalization.
//!
//! This crate turns a configured feed URL into a lazy sequence of
//! normalized events:
//!
//! ```text
//!   Url ──► FeedFetcher ──► ByteStream ──► FeedDecoder ──► RawEvent
//!                                                            │
//!                                           normalize_event()│
//!                                                            ▼
//!                                                      CalendarEvent
//! ```
//!
//! - [`FeedFetcher`] - The transport seam; [`HttpFetcher`] is the reqwest implementation
//! - [`FeedDecoder`] - Pulls one VEVENT at a time out of a byte stream
//! - [`normalize_event`] - Resolves time zones and drops past or malformed events
//! - [`ProviderError`] / [`DecodeError`] - Error types for the above

pub mod error;
pub mod fetch;
pub mod ics;
pub mod normalize;
pub mod raw_event;

pub use error::{DecodeError, DecodeResult, ProviderError, ProviderErrorCode, ProviderResult};
pub use fetch::{BoxFuture, ByteStream, FeedFetcher, HttpFetcher, HttpFetcherConfig};
pub use ics::FeedDecoder;
pub use normalize::{NormalizeError, normalize_event};
pub use raw_event::{RawEvent, RawEventTime};
