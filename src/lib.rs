//! Workspace state engine for a terminal-first desktop shell.
//!
//! The engine owns all mutable workspace state: the tab registry and
//! dual-panel layout, the single interactive session's lifecycle, the
//! lazily materialized file tree, and the recent-session list. A front end
//! feeds it [`Action`]s and renders from the [`WorkspaceEvent`]s it emits;
//! filesystem and process work happens off the dispatch thread and
//! re-enters as actions.

pub mod app;
pub mod error;
pub mod files;
pub mod models;
pub mod persistence;
pub mod pty;

pub use app::{Action, AppState, Collaborators, Engine, EngineConfig, WorkspaceEvent};
pub use error::WorkspaceError;
