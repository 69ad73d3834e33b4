//! Core types: sources, registry, formatting strategies, filters, tracing

pub mod error;
pub mod event;
pub mod filter;
pub mod format;
pub mod record;
pub mod registry;
pub mod source;
pub mod time;
pub mod tracing;

pub use error::{ConfigError, ConfigResult};
pub use event::CalendarEvent;
pub use filter::KeywordFilter;
pub use format::Formatter;
pub use record::{FormattedRecord, strip_non_ascii};
pub use registry::resolve_sources;
pub use source::{EventSource, SourceConfig};
pub use time::{DisplayLayout, parse_timezone};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
