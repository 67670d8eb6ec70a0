//! Run-scoped scratch directory for fetched descriptors
//!
//! Every fetched descriptor is written to its own fresh file before it is
//! parsed, so a subject can never pick up content fetched for another one.
//! The directory is removed when the `ScratchDir` is dropped, which covers
//! early returns and an interrupted run.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::errors::{AcquireError, AcquireResult};
use super::local::read_descriptor;

/// Owns the scratch directory for one run.
pub struct ScratchDir {
    dir: TempDir,
    staged: usize,
}

impl ScratchDir {
    /// Creates a fresh, empty scratch directory in the system temp dir.
    pub fn new() -> AcquireResult<Self> {
        Self::create(None)
    }

    /// Creates a fresh, empty scratch directory under `parent`.
    pub fn new_in(parent: &Path) -> AcquireResult<Self> {
        Self::create(Some(parent))
    }

    fn create(parent: Option<&Path>) -> AcquireResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("labelcheck-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(|e| AcquireError::Staging(e.to_string()))?;

        Ok(Self { dir, staged: 0 })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Number of descriptors staged so far
    pub fn staged(&self) -> usize {
        self.staged
    }

    /// Writes `text` to a new file named `filename` and returns its path.
    pub fn stage(&mut self, filename: &str, text: &str) -> AcquireResult<PathBuf> {
        let slot = self.dir.path().join(self.staged.to_string());
        fs::create_dir(&slot).map_err(|e| AcquireError::Staging(e.to_string()))?;

        let path = slot.join(filename);
        fs::write(&path, text).map_err(|e| AcquireError::Staging(e.to_string()))?;

        self.staged += 1;
        Ok(path)
    }

    /// Stages `text` and reads it back from disk.
    pub fn round_trip(&mut self, filename: &str, text: &str) -> AcquireResult<String> {
        let path = self.stage(filename, text)?;
        read_descriptor(&path)
    }

    /// Removes the directory, reporting any failure.
    pub fn close(self) -> AcquireResult<()> {
        self.dir
            .close()
            .map_err(|e| AcquireError::Staging(e.to_string()))
    }
}
