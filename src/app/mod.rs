mod action;
mod event;
mod handler;
mod runtime;
mod session;
pub mod state;

pub use action::Action;
pub use event::WorkspaceEvent;
pub use runtime::{Collaborators, Engine, EngineConfig};
pub use state::AppState;
