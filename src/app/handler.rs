use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::warn;

use crate::app::state::FetchRequest;
use crate::app::{Action, AppState, WorkspaceEvent};
use crate::files::DirectoryLister;
use crate::models::{PanelId, TabContent};

use super::runtime::Collaborators;
use super::session::{start_session, stop_session};

/// Applies one action to the state. The only place state mutates; filesystem
/// and process work is pushed onto blocking tasks whose results re-enter as
/// actions, so ordering stays serial.
pub fn process_action(
    state: &mut AppState,
    action: Action,
    deps: &Collaborators,
    pty_tx: &mpsc::Sender<Action>,
    action_tx: &mpsc::UnboundedSender<Action>,
    events: &mpsc::UnboundedSender<WorkspaceEvent>,
) -> Result<()> {
    match action {
        Action::Quit => {
            state.session.shutdown();
            state.system.should_quit = true;
        }

        // Workspace
        Action::SetWorkingDir(dir) => {
            set_working_dir(state, deps, action_tx, events, dir);
        }
        Action::CopyFiles { sources, dest } => {
            let copier = deps.copier.clone();
            let tx = action_tx.clone();
            tokio::task::spawn_blocking(move || {
                let outcomes = copier.copy(&sources, &dest);
                let _ = tx.send(Action::FilesCopied(outcomes));
            });
        }
        Action::FilesCopied(outcomes) => {
            let _ = events.send(WorkspaceEvent::FilesCopied(outcomes));
            for req in state.tree.refresh() {
                spawn_listing(deps.lister.clone(), req, action_tx.clone());
            }
        }

        // Session lifecycle
        Action::StartSession => {
            start_session(state, deps, pty_tx, events)?;
        }
        Action::StartSessionIn(dir) => {
            set_working_dir(state, deps, action_tx, events, dir);
            start_session(state, deps, pty_tx, events)?;
        }
        Action::StopSession => {
            stop_session(state, events);
        }
        Action::SendInput(data) => {
            let before = (state.session.phase(), state.session.attention());
            state.session.send_input(&data);
            emit_session_changes(state, before, events);
        }
        Action::Resize(cols, rows) => {
            state.system.terminal_size = (cols, rows);
            state.session.resize(cols, rows);
        }
        Action::InputNeeded => {
            let before = (state.session.phase(), state.session.attention());
            state.session.mark_awaiting_input();
            emit_session_changes(state, before, events);
        }
        Action::PtyOutput(id, data) => {
            // Output from a torn-down session is dropped.
            if state.session.is_current(id) {
                let _ = events.send(WorkspaceEvent::TerminalOutput(data));
            }
        }
        Action::SessionExited(id, code) => {
            if state.session.is_current(id) {
                let before = (state.session.phase(), state.session.attention());
                state.session.mark_exited(code);
                emit_session_changes(state, before, events);
            }
        }

        // Tabs and panels
        Action::OpenFile(path) => open_file(state, deps, action_tx, events, path, false),
        Action::OpenFileBeside(path) => open_file(state, deps, action_tx, events, path, true),
        Action::OpenUrl(url) => {
            let (id, _) = state.open_browser_tab(&url, false);
            let _ = events.send(WorkspaceEvent::TabOpened(id));
        }
        Action::OpenUrlBeside(url) => {
            let (id, _) = state.open_browser_tab(&url, true);
            let _ = events.send(WorkspaceEvent::TabOpened(id));
        }
        Action::ActivateTab(id, panel) => {
            if state.activate_tab(id, panel) {
                let _ = events.send(WorkspaceEvent::TabActivated(id, panel));
            }
        }
        Action::CloseTab(id) => {
            let closeable = state.tabs.get(id).map(|t| t.closeable).unwrap_or(false);
            state.close_tab(id);
            if closeable {
                let _ = events.send(WorkspaceEvent::TabClosed(id));
            }
        }
        Action::MoveTab(id, panel) => {
            // The Secondary panel only exists while the split is on.
            if panel == PanelId::Secondary && !state.panels.is_split() {
                return Ok(());
            }
            if state.tabs.get(id).is_some() {
                state.move_tab(id, panel, true);
                let _ = events.send(WorkspaceEvent::TabMoved(id, panel));
            }
        }
        Action::ToggleSplit => {
            state.toggle_split();
            let _ = events.send(WorkspaceEvent::SplitChanged(state.panels.is_split()));
        }
        Action::DocumentRendered(id, result) => {
            // The tab may have been closed while the renderer ran.
            if let Some(tab) = state.tabs.get_mut(id) {
                match result {
                    Ok(doc) => {
                        tab.content = TabContent::Ready(doc);
                        let _ = events.send(WorkspaceEvent::DocumentReady(id));
                    }
                    Err(message) => {
                        tab.content = TabContent::Failed(message.clone());
                        let _ = events.send(WorkspaceEvent::DocumentFailed(id, message));
                    }
                }
            }
        }

        // File tree
        Action::ToggleDir(path) => match state.tree.toggle(&path) {
            Some(req) => spawn_listing(deps.lister.clone(), req, action_tx.clone()),
            None => {
                let _ = events.send(WorkspaceEvent::TreeUpdated);
            }
        },
        Action::ExpandAllDirs(path) => {
            if let Some(req) = state.tree.expand_all(&path) {
                spawn_listing(deps.lister.clone(), req, action_tx.clone());
            }
        }
        Action::RefreshTree => {
            for req in state.tree.refresh() {
                spawn_listing(deps.lister.clone(), req, action_tx.clone());
            }
        }
        Action::Listed {
            root_gen,
            path,
            entries,
            deep,
            expand_children,
        } => {
            let followups = state
                .tree
                .apply_listing(root_gen, &path, entries, deep, expand_children);
            for req in followups {
                spawn_listing(deps.lister.clone(), req, action_tx.clone());
            }
            if root_gen == state.tree.root_gen() {
                let _ = events.send(WorkspaceEvent::TreeUpdated);
            }
        }

        // Desktop hand-offs
        Action::OpenExternal(path) => deps.shell.open_path(&path),
        Action::RevealInFileManager(path) => deps.shell.reveal(&path),
        Action::OpenUrlExternal(url) => deps.shell.open_url(&url),
    }

    Ok(())
}

fn set_working_dir(
    state: &mut AppState,
    deps: &Collaborators,
    action_tx: &mpsc::UnboundedSender<Action>,
    events: &mpsc::UnboundedSender<WorkspaceEvent>,
    dir: PathBuf,
) {
    state.system.working_dir = Some(dir.clone());
    let _ = events.send(WorkspaceEvent::WorkingDirChanged(dir.clone()));
    let req = state.tree.set_root(dir);
    spawn_listing(deps.lister.clone(), req, action_tx.clone());
}

fn open_file(
    state: &mut AppState,
    deps: &Collaborators,
    action_tx: &mpsc::UnboundedSender<Action>,
    events: &mpsc::UnboundedSender<WorkspaceEvent>,
    path: PathBuf,
    beside: bool,
) {
    let (id, created) = state.open_file_tab(&path, beside);
    let _ = events.send(WorkspaceEvent::TabOpened(id));
    if created {
        let renderers = deps.renderers.clone();
        let tx = action_tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = renderers.render(&path).map_err(|e| e.to_string());
            let _ = tx.send(Action::DocumentRendered(id, result));
        });
    }
}

fn spawn_listing(
    lister: Arc<dyn DirectoryLister>,
    req: FetchRequest,
    action_tx: mpsc::UnboundedSender<Action>,
) {
    tokio::task::spawn_blocking(move || {
        // An unreadable directory degrades to an empty listing.
        let entries = match lister.list(&req.path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("listing {} failed: {e}", req.path.display());
                Vec::new()
            }
        };
        let _ = action_tx.send(Action::Listed {
            root_gen: req.root_gen,
            path: req.path,
            entries,
            deep: req.deep,
            expand_children: req.expand_children,
        });
    });
}

fn emit_session_changes(
    state: &AppState,
    before: (crate::models::SessionPhase, bool),
    events: &mpsc::UnboundedSender<WorkspaceEvent>,
) {
    let phase = state.session.phase();
    let attention = state.session.attention();
    if phase != before.0 {
        let _ = events.send(WorkspaceEvent::SessionPhaseChanged(phase));
    }
    if attention != before.1 {
        let _ = events.send(WorkspaceEvent::AttentionChanged(attention));
    }
}
