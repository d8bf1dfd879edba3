//! Observability for the guard store
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle and mutation events
//!
//! Observability is read-only: logging never changes the outcome of a store
//! operation and never fails it.
//!
//! ```ignore
//! use guardrec::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordCreated, &[("record_id", "1")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{min_level, Logger, Severity, LOG_LEVEL_ENV};

/// Log an event without fields
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log an event with fields; failure events go out at ERROR, others at INFO
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
