use std::collections::BTreeMap;
use std::path::Path;

use crate::models::{PanelId, Tab, TabContent, TabId, TabPayload, TERMINAL_TAB};

use super::AppState;

/// Single source of truth for all open content surfaces. A `BTreeMap` keyed
/// by id gives the deterministic "lowest remaining id" rule for free when a
/// panel needs a replacement active tab.
pub struct TabRegistry {
    tabs: BTreeMap<TabId, Tab>,
    next_id: u64,
}

impl TabRegistry {
    /// Starts with the permanent terminal tab in Primary.
    pub fn new() -> Self {
        let mut tabs = BTreeMap::new();
        tabs.insert(
            TERMINAL_TAB,
            Tab {
                id: TERMINAL_TAB,
                title: "Terminal".to_string(),
                closeable: false,
                panel: PanelId::Primary,
                payload: TabPayload::Terminal,
                content: TabContent::None,
            },
        );
        Self { tabs, next_id: 1 }
    }

    /// Registers a new closeable tab. Does not activate it.
    pub fn create(&mut self, title: String, payload: TabPayload, panel: PanelId) -> TabId {
        let id = TabId::new(self.next_id);
        self.next_id += 1;
        self.tabs.insert(
            id,
            Tab {
                id,
                title,
                closeable: true,
                panel,
                payload,
                content: TabContent::None,
            },
        );
        id
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(&id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.get_mut(&id)
    }

    pub(super) fn remove(&mut self, id: TabId) -> Option<Tab> {
        self.tabs.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.values()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Lowest-id tab currently owned by `panel`.
    pub fn first_in_panel(&self, panel: PanelId) -> Option<TabId> {
        self.tabs
            .values()
            .find(|t| t.panel == panel)
            .map(|t| t.id)
    }

    pub fn ids_in_panel(&self, panel: PanelId) -> Vec<TabId> {
        self.tabs
            .values()
            .filter(|t| t.panel == panel)
            .map(|t| t.id)
            .collect()
    }

    /// Single-instance lookup: at most one file tab per path.
    pub fn find_file(&self, path: &Path) -> Option<TabId> {
        self.tabs
            .values()
            .find(|t| t.file_path().map(|p| p.as_path()) == Some(path))
            .map(|t| t.id)
    }

    /// Single-instance lookup: at most one browser tab per URL.
    pub fn find_browser(&self, url: &str) -> Option<TabId> {
        self.tabs
            .values()
            .find(|t| t.browser_url() == Some(url))
            .map(|t| t.id)
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Closes a tab. Silently ignores unknown and non-closeable tabs. If the
    /// closed tab was its panel's active tab, the lowest remaining id in that
    /// panel (or none) takes over.
    pub fn close_tab(&mut self, id: TabId) {
        let Some(tab) = self.tabs.get(id) else {
            return;
        };
        if !tab.closeable {
            return;
        }
        let panel = tab.panel;
        self.tabs.remove(id);

        if self.panels.active(panel) == Some(id) {
            let replacement = self.tabs.first_in_panel(panel);
            self.panels.set_active(panel, replacement);
        }
    }

    /// Reassigns a tab's owning panel. No-op when it is already there. The
    /// source panel replaces its active tab preferring the terminal tab when
    /// it lives there, otherwise the lowest remaining id, otherwise none.
    pub fn move_tab(&mut self, id: TabId, target: PanelId, activate: bool) {
        let Some(tab) = self.tabs.get_mut(id) else {
            return;
        };
        let source = tab.panel;
        if source == target {
            return;
        }
        tab.panel = target;

        if self.panels.active(source) == Some(id) {
            let terminal_here = self
                .tabs
                .get(TERMINAL_TAB)
                .map(|t| t.panel == source)
                .unwrap_or(false);
            let replacement = if terminal_here {
                Some(TERMINAL_TAB)
            } else {
                self.tabs.first_in_panel(source)
            };
            self.panels.set_active(source, replacement);
        }

        if activate {
            self.panels.set_active(target, Some(id));
        }
    }

    /// Opens (or focuses) a file tab. Returns the tab id and whether it was
    /// newly created; a new tab still needs its content rendered.
    pub fn open_file_tab(&mut self, path: &Path, beside: bool) -> (TabId, bool) {
        if let Some(existing) = self.tabs.find_file(path) {
            self.focus_opened(existing, beside);
            return (existing, false);
        }

        let title = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        let id = self
            .tabs
            .create(title, TabPayload::File(path.to_path_buf()), PanelId::Primary);
        if let Some(tab) = self.tabs.get_mut(id) {
            tab.content = TabContent::Loading;
        }
        self.focus_opened(id, beside);
        (id, true)
    }

    /// Opens (or focuses) a browser tab, titled by the URL's host.
    pub fn open_browser_tab(&mut self, url: &str, beside: bool) -> (TabId, bool) {
        if let Some(existing) = self.tabs.find_browser(url) {
            self.focus_opened(existing, beside);
            return (existing, false);
        }

        let title = host_of(url).unwrap_or_else(|| "Browser".to_string());
        let id = self
            .tabs
            .create(title, TabPayload::Browser(url.to_string()), PanelId::Primary);
        self.focus_opened(id, beside);
        (id, true)
    }

    /// Focus a just-opened (or re-opened) tab: beside-the-terminal requests
    /// land in Secondary while the split is on, otherwise the tab is
    /// activated in whichever panel owns it.
    fn focus_opened(&mut self, id: TabId, beside: bool) {
        if beside && self.panels.is_split() {
            self.move_tab(id, PanelId::Secondary, true);
        } else if let Some(tab) = self.tabs.get(id) {
            let panel = tab.panel;
            self.activate_tab(id, panel);
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    let rest = url.split_once("://").map(|(_, r)| r)?;
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit_once('@').map(|(_, h)| h).unwrap_or(host);
    let host = host.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_state;
    use super::*;
    use crate::models::TabKind;
    use std::path::PathBuf;

    #[test]
    fn terminal_tab_exists_and_is_not_closeable() {
        let state = test_state();
        let terminal = state.tabs.get(TERMINAL_TAB).unwrap();
        assert_eq!(terminal.kind(), TabKind::Terminal);
        assert!(!terminal.closeable);
        assert_eq!(terminal.panel, PanelId::Primary);
    }

    #[test]
    fn closing_the_terminal_tab_is_a_no_op() {
        let mut state = test_state();
        state.close_tab(TERMINAL_TAB);
        assert!(state.tabs.get(TERMINAL_TAB).is_some());
        assert_eq!(state.tabs.len(), 1);
    }

    #[test]
    fn every_tab_belongs_to_exactly_one_panel() {
        let mut state = test_state();
        let (a, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        let (b, _) = state.open_file_tab(Path::new("/w/b.txt"), false);
        state.panels.set_split(true);
        state.move_tab(b, PanelId::Secondary, true);

        let primary = state.tabs.ids_in_panel(PanelId::Primary);
        let secondary = state.tabs.ids_in_panel(PanelId::Secondary);
        assert!(primary.contains(&a) && !secondary.contains(&a));
        assert!(secondary.contains(&b) && !primary.contains(&b));
        assert_eq!(primary.len() + secondary.len(), state.tabs.len());
    }

    #[test]
    fn closing_active_tab_activates_lowest_remaining_id() {
        let mut state = test_state();
        let (a, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        let (b, _) = state.open_file_tab(Path::new("/w/b.txt"), false);
        state.activate_tab(b, PanelId::Primary);

        state.close_tab(b);

        // Terminal tab has the lowest id in Primary.
        assert_eq!(state.panels.active(PanelId::Primary), Some(TERMINAL_TAB));
        assert!(state.tabs.get(a).is_some());
        assert!(state.tabs.get(b).is_none());
    }

    #[test]
    fn double_move_leaves_tab_active_only_in_final_panel() {
        let mut state = test_state();
        let (t, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        state.panels.set_split(true);

        state.move_tab(t, PanelId::Secondary, true);
        state.move_tab(t, PanelId::Primary, true);

        assert_eq!(state.tabs.get(t).unwrap().panel, PanelId::Primary);
        assert_eq!(state.panels.active(PanelId::Primary), Some(t));
        assert_ne!(state.panels.active(PanelId::Secondary), Some(t));
        assert!(state.tabs.ids_in_panel(PanelId::Secondary).is_empty());
    }

    #[test]
    fn move_prefers_terminal_as_source_replacement() {
        let mut state = test_state();
        let (a, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        let (b, _) = state.open_file_tab(Path::new("/w/b.txt"), false);
        state.panels.set_split(true);
        state.activate_tab(b, PanelId::Primary);

        state.move_tab(b, PanelId::Secondary, false);

        assert_eq!(state.panels.active(PanelId::Primary), Some(TERMINAL_TAB));
        let _ = a;
    }

    #[test]
    fn opening_same_path_twice_reuses_the_tab() {
        let mut state = test_state();
        let (first, created_first) = state.open_file_tab(Path::new("/w/a.txt"), false);
        let (second, created_second) = state.open_file_tab(Path::new("/w/a.txt"), false);

        assert!(created_first);
        assert!(!created_second);
        assert_eq!(first, second);
        assert_eq!(
            state.tabs.iter().filter(|t| t.kind() == TabKind::File).count(),
            1
        );
        assert_eq!(state.panels.active(PanelId::Primary), Some(first));
    }

    #[test]
    fn opening_same_url_twice_reuses_the_tab() {
        let mut state = test_state();
        let (first, _) = state.open_browser_tab("https://docs.rs/tokio", false);
        let (second, created) = state.open_browser_tab("https://docs.rs/tokio", false);

        assert!(!created);
        assert_eq!(first, second);
        assert_eq!(state.tabs.get(first).unwrap().title, "docs.rs");
    }

    #[test]
    fn open_beside_lands_in_secondary_while_split() {
        let mut state = test_state();
        state.panels.set_split(true);

        let (id, _) = state.open_file_tab(Path::new("/w/a.txt"), true);

        assert_eq!(state.tabs.get(id).unwrap().panel, PanelId::Secondary);
        assert_eq!(state.panels.active(PanelId::Secondary), Some(id));
    }

    #[test]
    fn file_title_is_last_segment() {
        let mut state = test_state();
        let (id, _) = state.open_file_tab(&PathBuf::from("/deep/dir/report.csv"), false);
        assert_eq!(state.tabs.get(id).unwrap().title, "report.csv");
    }

    #[test]
    fn host_extraction() {
        assert_eq!(host_of("https://docs.rs/tokio"), Some("docs.rs".into()));
        assert_eq!(
            host_of("http://localhost:8080/x"),
            Some("localhost".into())
        );
        assert_eq!(host_of("not a url"), None);
    }
}
