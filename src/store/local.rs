use std::fs;
use std::path::{Path, PathBuf};

use crate::schedule::SubjectCollection;

use super::StoreError;

/// The subject list as one JSON array on disk.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty list.
    pub fn load(&self) -> Result<SubjectCollection, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no local subject file yet");
            return Ok(SubjectCollection::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let subjects: SubjectCollection = serde_json::from_str(&content)?;
        tracing::info!(count = subjects.len(), path = %self.path.display(), "loaded subjects from local file");
        Ok(subjects)
    }

    /// Write the whole list, replacing the file atomically.
    pub fn save(&self, subjects: &SubjectCollection) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_string_pretty(subjects)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp, &self.path).map_err(|source| self.io_error(source))?;
        tracing::debug!(count = subjects.len(), "saved subjects to local file");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
