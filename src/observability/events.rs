//! Observable events
//!
//! Events are explicit and typed; the logger only ever sees their names.

use std::fmt;

/// Observable events during a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Annotation table loaded
    SchemaLoaded,
    /// Interrupted by the user; scratch space released
    Interrupted,

    // Acquisition
    /// Descriptor could not be obtained
    AcquireFailed,
    /// A directory entry could not be read during a walk
    WalkEntrySkipped,
    /// Registry search returned results
    SearchResults,
    /// A search result was not selected for checking
    SearchResultDropped,

    // Validation
    /// Descriptor text could not be decoded into labels
    ParseFailed,
    /// Label outside the vendor namespace
    LabelIgnored,
    /// One subject has been validated
    SubjectChecked,
}

impl Event {
    /// Returns the event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::Interrupted => "INTERRUPTED",
            Event::AcquireFailed => "ACQUIRE_FAILED",
            Event::WalkEntrySkipped => "WALK_ENTRY_SKIPPED",
            Event::SearchResults => "SEARCH_RESULTS",
            Event::SearchResultDropped => "SEARCH_RESULT_DROPPED",
            Event::ParseFailed => "PARSE_FAILED",
            Event::LabelIgnored => "LABEL_IGNORED",
            Event::SubjectChecked => "SUBJECT_CHECKED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
