use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One entry from a directory listing. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_directory: bool,
    pub path: PathBuf,
}

/// Per-file result of a copy batch. A failed file never aborts the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyOutcome {
    pub name: String,
    pub error: Option<String>,
}

impl CopyOutcome {
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: Some(error.into()),
        }
    }

    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}
