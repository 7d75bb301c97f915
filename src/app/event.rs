use std::path::PathBuf;

use crate::models::{CopyOutcome, PanelId, RecentSessionEntry, SessionPhase, TabId};

/// Notifications the engine pushes out to whatever front end is attached.
/// Events describe state that already changed; they carry enough to render
/// without reaching back into [`AppState`](super::AppState).
#[derive(Debug)]
pub enum WorkspaceEvent {
    TerminalOutput(Vec<u8>),
    SessionPhaseChanged(SessionPhase),
    AttentionChanged(bool),

    WorkingDirChanged(PathBuf),
    TreeUpdated,
    RecentSessionsChanged(Vec<RecentSessionEntry>),
    FilesCopied(Vec<CopyOutcome>),

    TabOpened(TabId),
    TabClosed(TabId),
    TabMoved(TabId, PanelId),
    TabActivated(TabId, PanelId),
    SplitChanged(bool),
    DocumentReady(TabId),
    DocumentFailed(TabId, String),

    /// The user asked for something that needs a choice first, like starting
    /// a session with no working directory selected.
    WorkingDirRequired,
    InlineError(String),
}
