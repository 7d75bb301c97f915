use std::path::PathBuf;

use uuid::Uuid;

use crate::models::{CopyOutcome, DirEntryInfo, PanelId, TabId};

/// Every mutation of [`AppState`](super::AppState) enters through one of
/// these. User intent and completed background work share the same channel,
/// so the engine loop is the only writer.
#[derive(Debug)]
pub enum Action {
    // Workspace
    SetWorkingDir(PathBuf),
    CopyFiles {
        sources: Vec<PathBuf>,
        dest: PathBuf,
    },
    FilesCopied(Vec<CopyOutcome>),

    // Session lifecycle
    StartSession,
    StartSessionIn(PathBuf),
    StopSession,
    SendInput(Vec<u8>),
    Resize(u16, u16),
    InputNeeded,
    PtyOutput(Uuid, Vec<u8>),
    SessionExited(Uuid, i32),

    // Tabs and panels
    OpenFile(PathBuf),
    OpenFileBeside(PathBuf),
    OpenUrl(String),
    OpenUrlBeside(String),
    ActivateTab(TabId, PanelId),
    CloseTab(TabId),
    MoveTab(TabId, PanelId),
    ToggleSplit,
    DocumentRendered(TabId, Result<crate::files::RenderedDocument, String>),

    // File tree
    ToggleDir(PathBuf),
    ExpandAllDirs(PathBuf),
    RefreshTree,
    Listed {
        root_gen: u64,
        path: PathBuf,
        entries: Vec<DirEntryInfo>,
        deep: bool,
        expand_children: bool,
    },

    // Desktop hand-offs
    OpenExternal(PathBuf),
    RevealInFileManager(PathBuf),
    OpenUrlExternal(String),

    Quit,
}
