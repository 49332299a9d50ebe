//! Event Sink Implementations
//!
//! Concrete implementations of BuildEventSink:
//! - JsonEventSink: NDJSON output for automation
//! - TracingEventSink: structured log records

mod json;
mod trace;

pub use self::json::JsonEventSink;
pub use self::trace::TracingEventSink;
