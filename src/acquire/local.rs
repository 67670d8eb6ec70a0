//! Local descriptor files

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::observability::{Event, Logger};

use super::errors::{AcquireError, AcquireResult};

/// Reads one descriptor file.
pub fn read_descriptor(path: &Path) -> AcquireResult<String> {
    fs::read_to_string(path).map_err(|e| AcquireError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Expands a path into descriptor subjects.
///
/// A directory is walked recursively and every file named `filename` is
/// returned, in file-name order. Anything else is returned as-is so that a
/// missing or unreadable path is reported when it is read.
pub fn find_descriptors(root: &Path, filename: &str) -> Vec<PathBuf> {
    if !root.is_dir() {
        return vec![root.to_path_buf()];
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                let reason = e.to_string();
                Logger::warn(
                    Event::WalkEntrySkipped.as_str(),
                    &[("path", path.as_str()), ("reason", reason.as_str())],
                );
                continue;
            }
        };

        if entry.file_type().is_file() && entry.file_name() == filename {
            found.push(entry.into_path());
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_descriptor() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Dockerfile");
        fs::write(&path, "FROM alpine\n").unwrap();

        assert_eq!(read_descriptor(&path).unwrap(), "FROM alpine\n");
    }

    #[test]
    fn test_read_missing_descriptor_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_descriptor(&temp_dir.path().join("Dockerfile")).unwrap_err();
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_walk_finds_nested_descriptors_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("web/nested")).unwrap();
        fs::create_dir_all(root.join("db")).unwrap();
        fs::write(root.join("web/Dockerfile"), "FROM nginx\n").unwrap();
        fs::write(root.join("web/nested/Dockerfile"), "FROM alpine\n").unwrap();
        fs::write(root.join("db/Dockerfile"), "FROM postgres\n").unwrap();
        fs::write(root.join("db/Dockerfile.bak"), "FROM postgres\n").unwrap();
        fs::write(root.join("README"), "docs\n").unwrap();

        let found = find_descriptors(root, "Dockerfile");
        let relative: Vec<PathBuf> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("db/Dockerfile"),
                PathBuf::from("web/Dockerfile"),
                PathBuf::from("web/nested/Dockerfile"),
            ]
        );
    }

    #[test]
    fn test_plain_file_is_its_own_subject() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.dockerfile");
        fs::write(&path, "FROM alpine\n").unwrap();

        assert_eq!(find_descriptors(&path, "Dockerfile"), vec![path]);
    }
}
