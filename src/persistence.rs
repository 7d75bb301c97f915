use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::RecentSessionEntry;

pub const MAX_RECENT_SESSIONS: usize = 10;

/// On-disk shape: a single named key holding the ordered list.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredRecents {
    recent_sessions: Vec<RecentSessionEntry>,
}

/// Bounded, ordered, deduplicated list of previously used working
/// directories. Newest first, unique by path, capped at
/// `MAX_RECENT_SESSIONS`, persisted as JSON across restarts.
pub struct RecentSessionStore {
    path: PathBuf,
    entries: Vec<RecentSessionEntry>,
}

fn default_store_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
        .join("workdesk");

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir.join("recent_sessions.json"))
}

impl RecentSessionStore {
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(default_store_path()?))
    }

    /// Missing or corrupt storage degrades to an empty list.
    pub fn open(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<StoredRecents>(&contents) {
                Ok(stored) => stored.recent_sessions,
                Err(e) => {
                    warn!("recent-session store unreadable, starting empty: {e}");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { path, entries }
    }

    pub fn entries(&self) -> &[RecentSessionEntry] {
        &self.entries
    }

    /// Front-insert `dir`, dropping any previous entry for the same path and
    /// truncating to the cap, then save.
    pub fn record(&mut self, dir: &Path) -> Result<()> {
        self.entries.retain(|e| e.path != dir);
        self.entries.insert(0, RecentSessionEntry::new(dir));
        self.entries.truncate(MAX_RECENT_SESSIONS);
        self.save()
    }

    fn save(&self) -> Result<()> {
        let stored = StoredRecents {
            recent_sessions: self.entries.clone(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
