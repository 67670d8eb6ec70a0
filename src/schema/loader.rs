//! Schema loader for the annotation table
//!
//! The table is data, not code:
//! - The built-in table is embedded from `annotations.json`
//! - An override file in the same format can replace it
//! - Tables are checked structurally before use and never mutated

use std::fs;
use std::path::Path;

use super::errors::{SchemaError, SchemaResult};
use super::types::AnnotationSchema;

const BUILTIN_TABLE: &str = include_str!("annotations.json");
const BUILTIN_ORIGIN: &str = "<builtin>";

/// Loads annotation tables from the embedded default or from disk.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Returns the built-in annotation table.
    pub fn builtin() -> SchemaResult<AnnotationSchema> {
        Self::parse(BUILTIN_ORIGIN, BUILTIN_TABLE)
    }

    /// Loads the override table when a path is given, the built-in one otherwise.
    pub fn load(path: Option<&Path>) -> SchemaResult<AnnotationSchema> {
        match path {
            Some(path) => Self::load_file(path),
            None => Self::builtin(),
        }
    }

    /// Loads a single schema file.
    pub fn load_file(path: &Path) -> SchemaResult<AnnotationSchema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::unreadable(path.display().to_string(), e.to_string())
        })?;

        Self::parse(&path.display().to_string(), &content)
    }

    fn parse(origin: &str, content: &str) -> SchemaResult<AnnotationSchema> {
        let schema: AnnotationSchema = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed_schema(origin, format!("Invalid JSON: {}", e)))?;

        schema
            .validate_structure()
            .map_err(|e| SchemaError::malformed_schema(origin, e))?;

        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::SchemaErrorCode;
    use super::super::types::RuleKind;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_table_loads() {
        let schema = SchemaLoader::builtin().unwrap();
        assert_eq!(schema.namespace, "vendor.");
        assert_eq!(schema.rule("vendor.autostart").unwrap().kind, RuleKind::Boolean);
        assert_eq!(
            schema.rule("vendor.primary-network-mode").unwrap().default.as_deref(),
            Some("NAT")
        );
        match &schema.rule("vendor.volumes").unwrap().kind {
            RuleKind::JsonList { allowed_subkeys } => {
                assert!(allowed_subkeys.contains("readonly"));
                assert!(!allowed_subkeys.contains("bogus"));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_load_without_override_is_builtin() {
        assert_eq!(SchemaLoader::load(None).unwrap(), SchemaLoader::builtin().unwrap());
    }

    #[test]
    fn test_load_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("labels.json");
        fs::write(
            &path,
            r#"{"namespace": "acme.", "labels": {"acme.enabled": {"kind": "boolean"}}}"#,
        )
        .unwrap();

        let schema = SchemaLoader::load(Some(&path)).unwrap();
        assert_eq!(schema.namespace, "acme.");
        assert_eq!(schema.labels.len(), 1);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let result = SchemaLoader::load_file(&temp_dir.path().join("absent.json"));
        assert_eq!(result.unwrap_err().code(), SchemaErrorCode::Unreadable);
    }

    #[test]
    fn test_structural_violation_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("labels.json");
        fs::write(
            &path,
            r#"{"namespace": "acme.", "labels": {"other.enabled": {"kind": "boolean"}}}"#,
        )
        .unwrap();

        let err = SchemaLoader::load_file(&path).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::Malformed);
        assert!(err.message().contains("other.enabled"));
    }

    #[test]
    fn test_unknown_kind_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("labels.json");
        fs::write(
            &path,
            r#"{"namespace": "acme.", "labels": {"acme.x": {"kind": "regex"}}}"#,
        )
        .unwrap();

        let err = SchemaLoader::load_file(&path).unwrap_err();
        assert!(err.message().contains("Invalid JSON"));
    }
}
