use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::{Action, AppState, WorkspaceEvent};
use crate::files::{
    DirectoryLister, ExternalShell, FileCopier, FsCopier, FsLister, RendererRegistry, SystemShell,
};
use crate::persistence::RecentSessionStore;
use crate::pty::{ProcessHost, PtySpawner, PTY_QUEUE_SIZE};

use super::handler::process_action;

/// Everything the handler touches outside pure state. Trait objects
/// throughout, so tests swap in fakes.
pub struct Collaborators {
    pub process_host: Arc<dyn ProcessHost>,
    pub lister: Arc<dyn DirectoryLister>,
    pub copier: Arc<dyn FileCopier>,
    pub renderers: Arc<RendererRegistry>,
    pub shell: Arc<dyn ExternalShell>,
}

impl Collaborators {
    /// Real implementations backed by the OS.
    pub fn system() -> Self {
        Self {
            process_host: Arc::new(PtySpawner::new()),
            lister: Arc::new(FsLister),
            copier: Arc::new(FsCopier),
            renderers: Arc::new(RendererRegistry::with_defaults()),
            shell: Arc::new(SystemShell),
        }
    }
}

#[derive(Debug, Default)]
pub struct EngineConfig {
    /// Command every session runs; `None` falls back to the user's shell.
    pub command: Option<String>,
    /// Working directory to select on startup.
    pub initial_dir: Option<PathBuf>,
    /// Recent-session storage location; `None` uses the platform config dir.
    pub storage_path: Option<PathBuf>,
}

/// Owns the state and both inbound channels: an unbounded one for user
/// intent and completed background work, and a bounded one the PTY reader
/// threads push output through (backpressure instead of unbounded growth).
/// Outbound notifications leave through the event channel handed back from
/// [`Engine::new`].
pub struct Engine {
    state: AppState,
    deps: Collaborators,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    pty_tx: mpsc::Sender<Action>,
    pty_rx: mpsc::Receiver<Action>,
    events: mpsc::UnboundedSender<WorkspaceEvent>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        deps: Collaborators,
    ) -> Result<(Self, mpsc::UnboundedReceiver<WorkspaceEvent>)> {
        let recent = match config.storage_path {
            Some(path) => RecentSessionStore::open(path),
            None => RecentSessionStore::open_default()?,
        };
        let mut state = AppState::new(recent);
        state.system.command = config.command;

        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (pty_tx, pty_rx) = mpsc::channel(PTY_QUEUE_SIZE);
        let (events, event_rx) = mpsc::unbounded_channel();

        if let Some(dir) = config.initial_dir {
            let _ = action_tx.send(Action::SetWorkingDir(dir));
        }

        Ok((
            Self {
                state,
                deps,
                action_tx,
                action_rx,
                pty_tx,
                pty_rx,
                events,
            },
            event_rx,
        ))
    }

    /// Handle for feeding actions in from the outside.
    pub fn actions(&self) -> mpsc::UnboundedSender<Action> {
        self.action_tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serial dispatch loop. Runs until `Action::Quit`.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let action = tokio::select! {
                Some(action) = self.action_rx.recv() => action,
                Some(action) = self.pty_rx.recv() => action,
                else => break,
            };
            debug!(?action, "dispatch");
            process_action(
                &mut self.state,
                action,
                &self.deps,
                &self.pty_tx,
                &self.action_tx,
                &self.events,
            )?;
            if self.state.system.should_quit {
                break;
            }
        }
        Ok(())
    }
}
