pub mod panels;
pub mod session;
pub mod system;
pub mod tabs;
pub mod tree;

pub use panels::PanelLayout;
pub use session::SessionController;
pub use system::SystemState;
pub use tabs::TabRegistry;
pub use tree::{FetchRequest, FileTreeCache, TreeNode};

use crate::persistence::RecentSessionStore;

/// The whole mutable workspace, owned by the engine loop and mutated only on
/// its thread. Everything asynchronous re-enters through actions.
pub struct AppState {
    pub tabs: TabRegistry,
    pub panels: PanelLayout,
    pub session: SessionController,
    pub tree: FileTreeCache,
    pub recent: RecentSessionStore,
    pub system: SystemState,
}

impl AppState {
    pub fn new(recent: RecentSessionStore) -> Self {
        Self {
            tabs: TabRegistry::new(),
            panels: PanelLayout::new(),
            session: SessionController::new(),
            tree: FileTreeCache::new(),
            recent,
            system: SystemState::new(),
        }
    }
}
