use std::fmt;
use std::path::PathBuf;

use crate::files::RenderedDocument;

/// Opaque tab identifier, monotonically assigned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(u64);

/// The permanent terminal tab. Created at registry construction, never closed.
pub const TERMINAL_TAB: TabId = TabId(0);

impl TabId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Primary,
    Secondary,
}

impl PanelId {
    /// The opposite panel, used by "move to other panel" actions.
    pub fn other(&self) -> PanelId {
        match self {
            PanelId::Primary => PanelId::Secondary,
            PanelId::Secondary => PanelId::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Terminal,
    File,
    Browser,
}

/// Kind-specific payload. The kind of a tab is derived from its payload so
/// the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabPayload {
    Terminal,
    File(PathBuf),
    Browser(String),
}

impl TabPayload {
    pub fn kind(&self) -> TabKind {
        match self {
            TabPayload::Terminal => TabKind::Terminal,
            TabPayload::File(_) => TabKind::File,
            TabPayload::Browser(_) => TabKind::Browser,
        }
    }
}

/// Loading state of a file tab's rendered content.
#[derive(Debug, Clone, Default)]
pub enum TabContent {
    #[default]
    None,
    Loading,
    Ready(RenderedDocument),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub closeable: bool,
    pub panel: PanelId,
    pub payload: TabPayload,
    pub content: TabContent,
}

impl Tab {
    pub fn kind(&self) -> TabKind {
        self.payload.kind()
    }

    pub fn file_path(&self) -> Option<&PathBuf> {
        match &self.payload {
            TabPayload::File(path) => Some(path),
            _ => None,
        }
    }

    pub fn browser_url(&self) -> Option<&str> {
        match &self.payload {
            TabPayload::Browser(url) => Some(url),
            _ => None,
        }
    }
}
