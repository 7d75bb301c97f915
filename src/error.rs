use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the workspace engine.
///
/// `Spawn` and `Conversion` surface inline where they happen (session status,
/// tab content); `Io` during a directory listing degrades that listing to
/// empty; `NoWorkingDir` blocks the action with a user-facing prompt.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to start session: {0}")]
    Spawn(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not render {path}: {message}")]
    Conversion { path: PathBuf, message: String },

    #[error("no working directory selected")]
    NoWorkingDir,
}

impl WorkspaceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn conversion(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Conversion {
            path: path.into(),
            message: message.into(),
        }
    }
}
