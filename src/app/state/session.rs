use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::models::SessionPhase;
use crate::pty::SessionHandle;

/// Grace period between interrupt and kill during engine shutdown.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Lifecycle wrapper around the single interactive child process. Holds the
/// duplex handle only while a session is attached; every start gets a fresh
/// session id so output and exit notifications from a torn-down process are
/// recognized as stale and dropped.
pub struct SessionController {
    phase: SessionPhase,
    session_id: Option<Uuid>,
    handle: Option<Box<dyn SessionHandle>>,
    attention: bool,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            session_id: None,
            handle: None,
            attention: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn attention(&self) -> bool {
        self.attention
    }

    pub fn is_attached(&self) -> bool {
        self.phase.is_attached()
    }

    /// True when `id` identifies the currently attached session.
    pub fn is_current(&self, id: Uuid) -> bool {
        self.session_id == Some(id) && self.is_attached()
    }

    /// Tears down any attached process: kill is issued and the handle
    /// discarded immediately, without waiting for exit confirmation.
    pub fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.kill() {
                warn!("failed to kill session process: {e}");
            }
        }
        self.session_id = None;
    }

    /// Engine-shutdown teardown: interrupt first, escalate to kill after
    /// the grace period. Blocking here is fine, nothing runs afterwards.
    pub fn shutdown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.interrupt_then_kill(SHUTDOWN_GRACE) {
                warn!("failed to shut down session process: {e}");
            }
        }
        self.session_id = None;
    }

    /// Enters Starting for a fresh session id.
    pub fn begin(&mut self, id: Uuid) {
        self.teardown();
        self.session_id = Some(id);
        self.attention = false;
        self.phase = SessionPhase::Starting;
    }

    /// Attaches the spawned process handle; Starting -> Live.
    pub fn attach(&mut self, handle: Box<dyn SessionHandle>) {
        self.handle = Some(handle);
        self.phase = SessionPhase::Live;
    }

    /// Spawn failed: no handle, no exit code. Same surface as an exit.
    pub fn fail_spawn(&mut self) {
        self.session_id = None;
        self.handle = None;
        self.phase = SessionPhase::Exited(None);
    }

    /// Process terminated on its own.
    pub fn mark_exited(&mut self, code: i32) {
        self.handle = None;
        self.session_id = None;
        self.attention = false;
        self.phase = SessionPhase::Exited(Some(code));
    }

    /// Explicit user stop.
    pub fn stop(&mut self) {
        if !self.is_attached() {
            return;
        }
        self.teardown();
        self.attention = false;
        self.phase = SessionPhase::Stopped;
    }

    /// Side-channel "needs input" annotation. Soft status only.
    pub fn mark_awaiting_input(&mut self) {
        if self.phase == SessionPhase::Live {
            self.phase = SessionPhase::AwaitingInput;
            self.attention = true;
        }
    }

    /// Forwards keystrokes verbatim; any input clears the attention flag.
    pub fn send_input(&mut self, data: &[u8]) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if let Err(e) = handle.send_input(data) {
            warn!("failed to forward input to session: {e}");
        }
        if self.phase == SessionPhase::AwaitingInput {
            self.phase = SessionPhase::Live;
        }
        self.attention = false;
    }

    /// Forwards a geometry change while attached; swallowed otherwise.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if let Some(handle) = self.handle.as_ref() {
            if let Err(e) = handle.resize(cols, rows) {
                warn!("failed to resize session: {e}");
            }
        }
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}
