//! ObservationScope for automatic begin/complete logging
//!
//! - Logs BEGIN on creation
//! - Logs COMPLETE when completed
//! - Logs INCOMPLETE on drop otherwise (early return or interruption)

use std::cell::Cell;

use super::logger::Logger;

/// A scope that automatically logs begin and complete events
///
/// ```ignore
/// let scope = ObservationScope::with_fields("SEARCH", &[("pattern", "acme/")]);
/// // ... do work ...
/// scope.complete_with_fields(&[("subjects", "12")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    completed: Cell<bool>,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope, logging `{name}_BEGIN`
    pub fn new(name: &'a str) -> Self {
        Self::with_fields(name, &[])
    }

    /// Create a new observation scope with fields repeated on every event
    pub fn with_fields(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        let scope = Self {
            name,
            completed: Cell::new(false),
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        };
        Logger::info(&scope.event("BEGIN"), &scope.fields_with(&[]));
        scope
    }

    /// Mark the scope as completed, logging `{name}_COMPLETE`
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed with additional fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        Logger::info(&self.event("COMPLETE"), &self.fields_with(extra_fields));
    }

    /// Mark the scope as failed, logging `{name}_FAILED` at ERROR level
    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        Logger::error(&self.event("FAILED"), &self.fields_with(&[("reason", reason)]));
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }

    fn event(&self, suffix: &str) -> String {
        format!("{}_{}", self.name, suffix)
    }

    /// Scope fields followed by `extra`
    fn fields_with<'b>(&'b self, extra: &[(&'b str, &'b str)]) -> Vec<(&'b str, &'b str)> {
        self.fields
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(extra.iter().copied())
            .collect()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.is_completed() {
            Logger::warn(
                &self.event("INCOMPLETE"),
                &self.fields_with(&[("reason", "scope dropped without completion")]),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_event_names() {
        let scope = ObservationScope::new("TEST_RUN");
        assert!(!scope.is_completed());
        assert_eq!(scope.event("BEGIN"), "TEST_RUN_BEGIN");
        assert_eq!(scope.event("COMPLETE"), "TEST_RUN_COMPLETE");
        scope.complete();
    }

    #[test]
    fn test_scope_fields_repeat_before_extras() {
        let scope = ObservationScope::with_fields("SEARCH", &[("pattern", "acme/")]);
        assert_eq!(
            scope.fields_with(&[("subjects", "3")]),
            vec![("pattern", "acme/"), ("subjects", "3")]
        );
        assert_eq!(scope.fields_with(&[]), vec![("pattern", "acme/")]);
        scope.complete_with_fields(&[("subjects", "3")]);
    }

    #[test]
    fn test_scope_dropped_without_completion() {
        let scope = ObservationScope::new("DROPPED");
        assert!(!scope.is_completed());
        assert_eq!(scope.event("INCOMPLETE"), "DROPPED_INCOMPLETE");
        drop(scope);
    }

    #[test]
    fn test_scope_fail_carries_reason() {
        let scope = ObservationScope::with_fields("SEARCH", &[("pattern", "acme/")]);
        assert_eq!(
            scope.fields_with(&[("reason", "registry unreachable")]),
            vec![("pattern", "acme/"), ("reason", "registry unreachable")]
        );
        scope.fail("registry unreachable");
    }
}
