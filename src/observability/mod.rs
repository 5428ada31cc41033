//! Observability for the outpass service
//!
//! Structured JSON line logging with typed event names. Logging is
//! synchronous and never fails the caller.
//!
//! ```ignore
//! use outpass::observability::{Event, Logger};
//!
//! Logger::info(Event::RequestSubmitted, &[("index", "0")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    };
    Logger::log(severity, event, fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_with_fields() {
        // Verifies no panic on either stream
        log_event_with_fields(Event::StoreLoaded, &[("records", "0")]);
        log_event_with_fields(Event::StartupFailed, &[("error", "bind failed")]);
    }
}
