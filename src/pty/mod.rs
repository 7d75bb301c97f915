mod manager;

pub use manager::{PtyHandle, PtySpawner};

use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::app::Action;
use crate::error::WorkspaceError;

/// Queue size for the per-session output channel. The reader thread blocks
/// when the consumer falls behind, preserving arrival order.
pub const PTY_QUEUE_SIZE: usize = 256;

/// What to spawn and how big the attached display surface is.
#[derive(Debug, Clone)]
pub struct SpawnSpec {
    pub session_id: Uuid,
    /// Command to run; `None` falls back to `$SHELL`, then `/bin/bash`.
    pub command: Option<String>,
    pub working_dir: PathBuf,
    pub cols: u16,
    pub rows: u16,
}

/// Process-spawning collaborator. Output bytes and the exit notification
/// arrive as `Action::PtyOutput` / `Action::SessionExited` on the channel.
pub trait ProcessHost: Send + Sync {
    fn spawn(
        &self,
        spec: &SpawnSpec,
        tx: mpsc::Sender<Action>,
    ) -> Result<Box<dyn SessionHandle>, WorkspaceError>;
}

/// Duplex handle to a running session process.
pub trait SessionHandle: Send {
    fn send_input(&mut self, data: &[u8]) -> anyhow::Result<()>;
    fn resize(&self, cols: u16, rows: u16) -> anyhow::Result<()>;
    fn kill(&mut self) -> anyhow::Result<()>;

    /// Graceful teardown for shutdown paths: interrupt first, then kill
    /// after `grace`. Defaults to an immediate kill.
    fn interrupt_then_kill(&mut self, grace: Duration) -> anyhow::Result<()> {
        let _ = grace;
        self.kill()
    }
}
