use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One previously used working directory, newest first in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSessionEntry {
    pub path: PathBuf,
    pub name: String,
    pub timestamp_millis: i64,
}

impl RecentSessionEntry {
    pub fn new(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            path: path.to_path_buf(),
            name,
            timestamp_millis: Utc::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_last_path_segment() {
        let entry = RecentSessionEntry::new(Path::new("/home/alex/projects/demo"));
        assert_eq!(entry.name, "demo");
        assert_eq!(entry.path, PathBuf::from("/home/alex/projects/demo"));
    }
}
