//! Annotation validator for descriptor labels
//!
//! Validation semantics, applied per label in key order:
//! - Keys outside the namespace are ignored (reported, not errors)
//! - Namespaced keys missing from the table are unrecognized
//! - Recognized keys are checked by their rule kind
//!
//! Validation is a total scan: every label is checked and every violation
//! is returned. Nothing is printed here.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::LabelSet;

use super::errors::ValidationError;
use super::types::{AnnotationSchema, RuleKind, NETWORK_MODES};

static PORT_MAPPING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:\d+/(tcp|udp)$").expect("static regex"));

/// What to do with a descriptor that carries no namespaced labels at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDescriptorPolicy {
    /// Accept it silently
    #[default]
    Allow,
    /// Report one validation error
    Flag,
}

/// Knobs that change validation outcomes without touching the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub empty_descriptor: EmptyDescriptorPolicy,
}

/// Outcome of validating one subject's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Violations in discovery order
    pub errors: Vec<ValidationError>,
    /// Keys skipped because they are outside the namespace
    pub ignored: Vec<String>,
}

impl Validation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks label sets against an annotation table.
///
/// Holds no per-subject state; every call returns a fresh `Validation`.
pub struct AnnotationValidator<'a> {
    schema: &'a AnnotationSchema,
    options: ValidatorOptions,
}

impl<'a> AnnotationValidator<'a> {
    /// Creates a validator with default options.
    pub fn new(schema: &'a AnnotationSchema) -> Self {
        Self::with_options(schema, ValidatorOptions::default())
    }

    pub fn with_options(schema: &'a AnnotationSchema, options: ValidatorOptions) -> Self {
        Self { schema, options }
    }

    /// Validates every label of `subject`.
    pub fn validate(&self, subject: &str, labels: &LabelSet) -> Validation {
        let mut validation = Validation::default();
        let mut namespaced = 0usize;

        for (key, value) in labels.iter() {
            if !self.schema.is_namespaced(key) {
                validation.ignored.push(key.to_string());
                continue;
            }
            namespaced += 1;

            let messages = match self.schema.rule(key) {
                None => vec![format!("unrecognized label {}: {}", key, value)],
                Some(rule) => check_value(key, value, &rule.kind),
            };

            validation.errors.extend(
                messages
                    .into_iter()
                    .map(|message| ValidationError::new(subject, message)),
            );
        }

        if namespaced == 0 && self.options.empty_descriptor == EmptyDescriptorPolicy::Flag {
            validation.errors.push(ValidationError::new(
                subject,
                format!("no {}* labels found", self.schema.namespace),
            ));
        }

        validation
    }
}

/// Checks one value against its rule kind, returning one message per violation.
fn check_value(key: &str, value: &str, kind: &RuleKind) -> Vec<String> {
    match kind {
        RuleKind::Boolean => check_boolean(key, value),
        RuleKind::PortMapping => check_port_mappings(key, value),
        RuleKind::NetworkMode => check_network_mode(key, value),
        RuleKind::JsonList { allowed_subkeys } => check_json_list(key, value, allowed_subkeys),
        RuleKind::Text => Vec::new(),
    }
}

fn check_boolean(key: &str, value: &str) -> Vec<String> {
    match value {
        "true" | "false" => Vec::new(),
        _ => vec![format!("{}: invalid true/false value '{}'", key, value)],
    }
}

fn check_port_mappings(key: &str, value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|segment| !PORT_MAPPING.is_match(segment))
        .map(|segment| format!("{}: invalid port mapping '{}'", key, segment))
        .collect()
}

fn check_network_mode(key: &str, value: &str) -> Vec<String> {
    if NETWORK_MODES.contains(&value) {
        Vec::new()
    } else {
        vec![format!("{}: invalid network mode '{}'", key, value)]
    }
}

fn check_json_list(key: &str, value: &str, allowed_subkeys: &BTreeSet<String>) -> Vec<String> {
    let value = value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    let parsed: Value = match serde_json::from_str(value) {
        Ok(parsed) => parsed,
        Err(e) => return vec![format!("{}: syntax error in JSON value: {}", key, e)],
    };

    let Some(elements) = parsed.as_array() else {
        return vec![format!("{}: expected a JSON array of objects", key)];
    };

    let mut messages = Vec::new();
    // Each foreign keyword is reported once, however many objects use it.
    let mut offending: Vec<&str> = Vec::new();

    for (i, element) in elements.iter().enumerate() {
        let Some(object) = element.as_object() else {
            messages.push(format!("{}: element {} is not a JSON object", key, i));
            continue;
        };

        for subkey in object.keys() {
            if !allowed_subkeys.contains(subkey) && !offending.contains(&subkey.as_str()) {
                offending.push(subkey);
            }
        }
    }

    messages.extend(
        offending
            .into_iter()
            .map(|subkey| format!("{}: invalid keyword '{}'", key, subkey)),
    );
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaLoader;

    fn schema() -> AnnotationSchema {
        SchemaLoader::builtin().unwrap()
    }

    fn errors_for(key: &str, value: &str) -> Vec<String> {
        let schema = schema();
        let labels: LabelSet = [(key, value)].into_iter().collect();
        AnnotationValidator::new(&schema)
            .validate("Dockerfile", &labels)
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    #[test]
    fn test_boolean_accepts_only_literals() {
        assert!(errors_for("vendor.autostart", "true").is_empty());
        assert!(errors_for("vendor.autostart", "false").is_empty());

        for bad in ["True", "1", "", "yes", " true"] {
            let errors = errors_for("vendor.autostart", bad);
            assert_eq!(errors.len(), 1, "value {:?}", bad);
            assert!(errors[0].contains("invalid true/false value"));
        }
    }

    #[test]
    fn test_port_mappings() {
        assert!(errors_for("vendor.port-mappings", "80:80/tcp,443:443/udp").is_empty());
        assert_eq!(errors_for("vendor.port-mappings", "80:80/xyz").len(), 1);
        assert_eq!(errors_for("vendor.port-mappings", "80/tcp").len(), 1);

        let errors = errors_for("vendor.port-mappings", "80:80/tcp,8080/udp");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("'8080/udp'"));
    }

    #[test]
    fn test_port_mappings_report_every_bad_segment() {
        let errors = errors_for("vendor.port-mappings", "a,80:80/tcp,b:c/udp");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("'a'"));
        assert!(errors[1].contains("'b:c/udp'"));
    }

    #[test]
    fn test_network_mode() {
        for mode in NETWORK_MODES {
            assert!(errors_for("vendor.primary-network-mode", mode).is_empty());
        }
        let errors = errors_for("vendor.primary-network-mode", "nat");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("invalid network mode"));
    }

    #[test]
    fn test_json_list_empty_is_valid() {
        assert!(errors_for("vendor.volumes", "").is_empty());
        assert!(errors_for("vendor.volumes", "   \n").is_empty());
    }

    #[test]
    fn test_json_list_syntax_error() {
        let errors = errors_for("vendor.volumes", "[{");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("syntax error"));
    }

    #[test]
    fn test_json_list_unknown_subkey() {
        let errors = errors_for("vendor.volumes", r#"[{"name": "/data", "bogus": 1}]"#);
        assert_eq!(errors, vec!["vendor.volumes: invalid keyword 'bogus'".to_string()]);
    }

    #[test]
    fn test_json_list_subkey_reported_once_across_objects() {
        let errors = errors_for(
            "vendor.settings",
            r#"[{"env": "A", "bogus": 1}, {"env": "B", "bogus": 2, "extra": 3}]"#,
        );
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("'bogus'"));
        assert!(errors[1].contains("'extra'"));
    }

    #[test]
    fn test_json_list_shape_errors() {
        let errors = errors_for("vendor.volumes", r#"{"name": "/data"}"#);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("expected a JSON array"));

        let errors = errors_for("vendor.volumes", r#"[{"name": "/data"}, "x", 3]"#);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("element 1"));
    }

    #[test]
    fn test_text_accepts_anything() {
        assert!(errors_for("vendor.web-ui-path", "/admin?x=1").is_empty());
        assert!(errors_for("vendor.version", "").is_empty());
    }

    #[test]
    fn test_unrecognized_and_ignored() {
        let schema = schema();
        let labels: LabelSet = [
            ("maintainer", "ops"),
            ("vendor.unknown-thing", "x"),
            ("vendor.autostart", "nope"),
        ]
        .into_iter()
        .collect();

        let validation = AnnotationValidator::new(&schema).validate("Dockerfile", &labels);
        assert_eq!(validation.ignored, vec!["maintainer".to_string()]);
        assert_eq!(validation.errors.len(), 2);
        assert_eq!(
            validation.errors[0].message,
            "unrecognized label vendor.unknown-thing: x"
        );
        assert!(validation.errors[1].message.contains("invalid true/false"));
        assert!(validation.errors.iter().all(|e| e.subject == "Dockerfile"));
    }

    #[test]
    fn test_empty_descriptor_policy() {
        let schema = schema();
        let labels: LabelSet = [("maintainer", "ops")].into_iter().collect();

        let allow = AnnotationValidator::new(&schema).validate("d", &labels);
        assert!(allow.is_clean());

        let flag = AnnotationValidator::with_options(
            &schema,
            ValidatorOptions {
                empty_descriptor: EmptyDescriptorPolicy::Flag,
            },
        )
        .validate("d", &labels);
        assert_eq!(flag.errors.len(), 1);
        assert!(flag.errors[0].message.contains("no vendor.* labels"));
    }
}
