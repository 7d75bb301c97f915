mod fs;
mod recent;
mod session;
mod tab;

pub use fs::{CopyOutcome, DirEntryInfo};
pub use recent::RecentSessionEntry;
pub use session::SessionPhase;
pub use tab::{PanelId, Tab, TabContent, TabId, TabKind, TabPayload, TERMINAL_TAB};
