use std::path::{Path, PathBuf};

use crate::models::CopyOutcome;

/// Copies files (or whole directories) into a destination directory.
/// Partial failure is per file; one bad source never aborts the batch.
pub trait FileCopier: Send + Sync {
    fn copy(&self, sources: &[PathBuf], dest: &Path) -> Vec<CopyOutcome>;
}

pub struct FsCopier;

impl FileCopier for FsCopier {
    fn copy(&self, sources: &[PathBuf], dest: &Path) -> Vec<CopyOutcome> {
        sources
            .iter()
            .map(|source| {
                let name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.to_string_lossy().into_owned());
                match copy_one(source, &dest.join(&name)) {
                    Ok(()) => CopyOutcome::ok(name),
                    Err(e) => CopyOutcome::failed(name, e.to_string()),
                }
            })
            .collect()
    }
}

fn copy_one(source: &Path, dest: &Path) -> std::io::Result<()> {
    if source.is_dir() {
        copy_dir(source, dest)
    } else {
        std::fs::copy(source, dest)?;
        Ok(())
    }
}

fn copy_dir(src: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
