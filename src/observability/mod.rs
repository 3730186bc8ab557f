//! Observability for invtrack
//!
//! Structured JSON logging and the typed event list. Observability is
//! read-only: logging never changes the outcome of a store operation, and a
//! broken log sink is ignored.
//!
//! ```ignore
//! use invtrack::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordSkipped, &[("line", "2"), ("reason", "...")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{threshold, Logger, Severity, LOG_LEVEL_ENV};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
