//! Observability for labelcheck
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed events
//! - Scope-based begin/complete tracing
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on validation results
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use labelcheck::observability::{Event, Logger, ObservationScope};
//!
//! Logger::info(Event::SubjectChecked.as_str(), &[("subject", "web/Dockerfile")]);
//!
//! let scope = ObservationScope::new("CHECK");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::info(event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::info(event.as_str(), fields);
}
