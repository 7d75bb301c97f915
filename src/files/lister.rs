use std::path::Path;

use crate::error::WorkspaceError;
use crate::models::DirEntryInfo;

/// Directory-listing collaborator. Returns raw entries; hidden-entry
/// filtering and ordering are the tree cache's business.
pub trait DirectoryLister: Send + Sync {
    fn list(&self, path: &Path) -> Result<Vec<DirEntryInfo>, WorkspaceError>;
}

/// Real lister over `std::fs`. Run on a blocking task, never on the
/// dispatch loop.
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, path: &Path) -> Result<Vec<DirEntryInfo>, WorkspaceError> {
        let read = std::fs::read_dir(path).map_err(|e| WorkspaceError::io(path, e))?;
        let mut entries = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| WorkspaceError::io(path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_directory = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            entries.push(DirEntryInfo {
                name,
                is_directory,
                path: entry.path(),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("note.txt"), "hi").unwrap();

        let mut entries = FsLister.list(dir.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "note.txt");
        assert!(!entries[0].is_directory);
        assert_eq!(entries[1].name, "sub");
        assert!(entries[1].is_directory);
    }

    #[test]
    fn missing_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsLister.list(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, WorkspaceError::Io { .. }));
    }
}
