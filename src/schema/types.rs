//! Annotation schema type definitions
//!
//! Supported rule kinds:
//! - boolean: literal `true` / `false`
//! - port_mapping: comma-separated `host:container/proto` list
//! - network_mode: one of the closed set of network modes
//! - json_list: JSON array of objects with a fixed set of keywords
//! - text: accepted as-is

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Network modes accepted by `network_mode` rules. Case-sensitive.
pub const NETWORK_MODES: [&str; 4] = ["NAT", "BRIDGED", "HOST", "NONE"];

/// Validation strategy applied to an annotation value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// Literal `true` or `false`
    Boolean,
    /// Comma-separated list of `host:container/tcp|udp`
    PortMapping,
    /// One of [`NETWORK_MODES`]
    NetworkMode,
    /// JSON array of objects whose keys are drawn from `allowed_subkeys`
    JsonList {
        allowed_subkeys: BTreeSet<String>,
    },
    /// Free-form value, presence is the only check
    Text,
}

impl RuleKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            RuleKind::Boolean => "boolean",
            RuleKind::PortMapping => "port_mapping",
            RuleKind::NetworkMode => "network_mode",
            RuleKind::JsonList { .. } => "json_list",
            RuleKind::Text => "text",
        }
    }
}

/// Rule attached to a single annotation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRule {
    /// Value assumed by consumers when the label is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(flatten)]
    pub kind: RuleKind,
}

impl AnnotationRule {
    pub fn boolean(default: bool) -> Self {
        Self {
            default: Some(default.to_string()),
            kind: RuleKind::Boolean,
        }
    }

    pub fn port_mapping() -> Self {
        Self {
            default: None,
            kind: RuleKind::PortMapping,
        }
    }

    pub fn network_mode(default: &str) -> Self {
        Self {
            default: Some(default.to_string()),
            kind: RuleKind::NetworkMode,
        }
    }

    pub fn json_list<I, S>(allowed_subkeys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default: None,
            kind: RuleKind::JsonList {
                allowed_subkeys: allowed_subkeys.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn text() -> Self {
        Self {
            default: None,
            kind: RuleKind::Text,
        }
    }
}

/// The complete annotation table: namespace prefix plus one rule per key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationSchema {
    /// Reserved prefix every vendor label starts with, e.g. `vendor.`
    pub namespace: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rules keyed by full label name
    pub labels: BTreeMap<String, AnnotationRule>,
}

impl AnnotationSchema {
    /// Create a new schema
    pub fn new(namespace: impl Into<String>, labels: BTreeMap<String, AnnotationRule>) -> Self {
        Self {
            namespace: namespace.into(),
            description: None,
            labels,
        }
    }

    /// Returns the rule for a label key
    pub fn rule(&self, key: &str) -> Option<&AnnotationRule> {
        self.labels.get(key)
    }

    /// Whether the key lives under the reserved namespace
    pub fn is_namespaced(&self, key: &str) -> bool {
        key.starts_with(&self.namespace)
    }

    /// Validates the table itself (not a label set)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.namespace.is_empty() {
            return Err("namespace must not be empty".into());
        }

        for (key, rule) in &self.labels {
            if !self.is_namespaced(key) || key.len() == self.namespace.len() {
                return Err(format!(
                    "label '{}' is outside namespace '{}'",
                    key, self.namespace
                ));
            }

            match (&rule.kind, rule.default.as_deref()) {
                (RuleKind::Boolean, Some(d)) if d != "true" && d != "false" => {
                    return Err(invalid_default(key, &rule.kind, d));
                }
                (RuleKind::NetworkMode, Some(d)) if !NETWORK_MODES.contains(&d) => {
                    return Err(invalid_default(key, &rule.kind, d));
                }
                (RuleKind::JsonList { allowed_subkeys }, _) if allowed_subkeys.is_empty() => {
                    return Err(format!(
                        "label '{}': {} needs allowed_subkeys",
                        key,
                        rule.kind.kind_name()
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn invalid_default(key: &str, kind: &RuleKind, default: &str) -> String {
    format!("label '{}': invalid {} default '{}'", key, kind.kind_name(), default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> AnnotationSchema {
        let mut labels = BTreeMap::new();
        labels.insert("vendor.autostart".into(), AnnotationRule::boolean(false));
        labels.insert("vendor.port-mappings".into(), AnnotationRule::port_mapping());
        labels.insert(
            "vendor.volumes".into(),
            AnnotationRule::json_list(["descr", "name"]),
        );
        AnnotationSchema::new("vendor.", labels)
    }

    #[test]
    fn test_schema_structure_valid() {
        assert!(sample_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_key_outside_namespace_rejected() {
        let mut schema = sample_schema();
        schema.labels.insert("other.flag".into(), AnnotationRule::text());

        let result = schema.validate_structure();
        assert!(result.unwrap_err().contains("other.flag"));
    }

    #[test]
    fn test_bad_boolean_default_rejected() {
        let mut schema = sample_schema();
        schema.labels.insert(
            "vendor.interactive".into(),
            AnnotationRule {
                default: Some("yes".into()),
                kind: RuleKind::Boolean,
            },
        );
        assert_eq!(
            schema.validate_structure().unwrap_err(),
            "label 'vendor.interactive': invalid boolean default 'yes'"
        );
    }

    #[test]
    fn test_empty_subkeys_rejected() {
        let mut schema = sample_schema();
        schema.labels.insert(
            "vendor.settings".into(),
            AnnotationRule::json_list(Vec::<String>::new()),
        );
        assert_eq!(
            schema.validate_structure().unwrap_err(),
            "label 'vendor.settings': json_list needs allowed_subkeys"
        );
    }

    #[test]
    fn test_rule_deserializes_flattened_kind() {
        let rule: AnnotationRule = serde_json::from_str(
            r#"{"kind": "json_list", "allowed_subkeys": ["env", "descr"]}"#,
        )
        .unwrap();
        assert_eq!(rule.kind.kind_name(), "json_list");
        assert!(rule.default.is_none());

        let rule: AnnotationRule =
            serde_json::from_str(r#"{"kind": "network_mode", "default": "NAT"}"#).unwrap();
        assert_eq!(rule, AnnotationRule::network_mode("NAT"));
    }

    #[test]
    fn test_is_namespaced() {
        let schema = sample_schema();
        assert!(schema.is_namespaced("vendor.anything"));
        assert!(!schema.is_namespaced("maintainer"));
    }
}
