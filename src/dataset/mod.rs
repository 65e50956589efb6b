//! Dataset access used to collect and discard program output captures.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// A failed dataset operation, in the shape dataset utilities report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dataset operation failed with rc {rc}: {stderr_response}")]
pub struct StorageError {
    pub rc: i32,
    pub stdout_response: String,
    pub stderr_response: String,
}

impl StorageError {
    pub fn new(rc: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            rc,
            stdout_response: stdout.into(),
            stderr_response: stderr.into(),
        }
    }
}

/// Read and delete access to sequential datasets.
pub trait DatasetStore: Send + Sync {
    fn read(&self, name: &str) -> Result<String, StorageError>;
    fn delete(&self, name: &str) -> Result<(), StorageError>;
}

/// Datasets backed by plain files named after the dataset under one directory.
///
/// Pairs with [`crate::mvs::MvsCmd`] sharing the same work directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StorageError::new(
                8,
                "",
                format!("invalid dataset name '{name}'"),
            ));
        }
        Ok(self.root.join(name))
    }
}

fn io_failure(action: &str, name: &str, err: std::io::Error) -> StorageError {
    let rc = if err.kind() == ErrorKind::NotFound { 8 } else { 12 };
    StorageError::new(rc, "", format!("{action} {name} failed: {err}"))
}

impl DatasetStore for FileStore {
    fn read(&self, name: &str) -> Result<String, StorageError> {
        let path = self.path_for(name)?;
        let bytes = fs::read(&path).map_err(|e| io_failure("read", name, e))?;
        debug!(dataset = name, bytes = bytes.len(), "read dataset");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).map_err(|e| io_failure("delete", name, e))?;
        debug!(dataset = name, "deleted dataset");
        Ok(())
    }
}

/// Stand-in for hosts without dataset access: every call fails immediately.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn failure(&self) -> StorageError {
        StorageError::new(
            -1,
            "",
            format!("dataset access is unavailable: {}", self.reason),
        )
    }
}

impl DatasetStore for UnavailableStore {
    fn read(&self, _name: &str) -> Result<String, StorageError> {
        Err(self.failure())
    }

    fn delete(&self, _name: &str) -> Result<(), StorageError> {
        Err(self.failure())
    }
}
