use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::{Action, AppState, WorkspaceEvent};
use crate::error::WorkspaceError;
use crate::pty::SpawnSpec;

use super::runtime::Collaborators;

/// Starts (or restarts) the one interactive session in the selected working
/// directory. Any still-attached process is killed first, so there is never
/// more than one child alive.
pub fn start_session(
    state: &mut AppState,
    deps: &Collaborators,
    pty_tx: &mpsc::Sender<Action>,
    events: &mpsc::UnboundedSender<WorkspaceEvent>,
) -> Result<()> {
    let dir = match state.system.working_dir.clone() {
        Some(dir) => dir,
        None => {
            debug!("session start blocked: {}", WorkspaceError::NoWorkingDir);
            let _ = events.send(WorkspaceEvent::WorkingDirRequired);
            return Ok(());
        }
    };

    if let Err(e) = state.recent.record(&dir) {
        warn!("could not persist recent sessions: {e}");
    }
    let _ = events.send(WorkspaceEvent::RecentSessionsChanged(
        state.recent.entries().to_vec(),
    ));

    let session_id = Uuid::new_v4();
    state.session.begin(session_id);
    let _ = events.send(WorkspaceEvent::SessionPhaseChanged(state.session.phase()));
    let _ = events.send(WorkspaceEvent::AttentionChanged(false));

    let (cols, rows) = state.system.terminal_size;
    let spec = SpawnSpec {
        session_id,
        command: state.system.command.clone(),
        working_dir: dir,
        cols,
        rows,
    };
    match deps.process_host.spawn(&spec, pty_tx.clone()) {
        Ok(handle) => {
            state.session.attach(handle);
            info!(%session_id, "session started");
        }
        Err(e) => {
            error!("session spawn failed: {e}");
            state.session.fail_spawn();
            let _ = events.send(WorkspaceEvent::InlineError(format!(
                "Failed to start session: {e}"
            )));
        }
    }
    let _ = events.send(WorkspaceEvent::SessionPhaseChanged(state.session.phase()));
    Ok(())
}

pub fn stop_session(state: &mut AppState, events: &mpsc::UnboundedSender<WorkspaceEvent>) {
    if !state.session.is_attached() {
        return;
    }
    state.session.stop();
    let _ = events.send(WorkspaceEvent::SessionPhaseChanged(state.session.phase()));
    let _ = events.send(WorkspaceEvent::AttentionChanged(false));
}
