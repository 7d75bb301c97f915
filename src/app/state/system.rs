use std::path::PathBuf;

/// Ambient process-wide bits: the selected working directory, the command a
/// session runs, the terminal geometry pushed down to the PTY, and the quit
/// latch.
pub struct SystemState {
    pub working_dir: Option<PathBuf>,
    pub command: Option<String>,
    pub terminal_size: (u16, u16),
    pub should_quit: bool,
}

impl SystemState {
    pub fn new() -> Self {
        Self {
            working_dir: None,
            command: None,
            terminal_size: (80, 24),
            should_quit: false,
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}
