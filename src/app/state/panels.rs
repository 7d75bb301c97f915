use crate::models::{PanelId, TabId, TERMINAL_TAB};

use super::AppState;

/// Panel-level invariants: one active tab per panel, and the Secondary panel
/// only holds tabs while the split is on.
pub struct PanelLayout {
    primary_active: Option<TabId>,
    secondary_active: Option<TabId>,
    split_active: bool,
    /// Tab pushed out of Primary when the split opened; re-activated there
    /// when the split closes, so a toggle round-trip restores focus.
    displaced: Option<TabId>,
}

impl PanelLayout {
    pub fn new() -> Self {
        Self {
            primary_active: Some(TERMINAL_TAB),
            secondary_active: None,
            split_active: false,
            displaced: None,
        }
    }

    pub fn active(&self, panel: PanelId) -> Option<TabId> {
        match panel {
            PanelId::Primary => self.primary_active,
            PanelId::Secondary => self.secondary_active,
        }
    }

    pub(super) fn set_active(&mut self, panel: PanelId, id: Option<TabId>) {
        match panel {
            PanelId::Primary => self.primary_active = id,
            PanelId::Secondary => self.secondary_active = id,
        }
    }

    pub fn is_split(&self) -> bool {
        self.split_active
    }

    pub(super) fn set_split(&mut self, on: bool) {
        self.split_active = on;
    }
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Makes a tab its panel's active tab. A tab can only be activated
    /// within the panel that currently owns it.
    pub fn activate_tab(&mut self, id: TabId, panel: PanelId) -> bool {
        match self.tabs.get(id) {
            Some(tab) if tab.panel == panel => {
                self.panels.set_active(panel, Some(id));
                true
            }
            _ => false,
        }
    }

    /// Flips Secondary-panel visibility.
    ///
    /// Turning on keeps the terminal visible: whatever non-terminal tab was
    /// focused in Primary moves beside it into Secondary. Turning off brings
    /// every Secondary tab home without activating any of them, then restores
    /// the tab that was focused in Primary before the split opened.
    pub fn toggle_split(&mut self) {
        if !self.panels.is_split() {
            self.panels.set_split(true);
            self.panels.displaced = None;

            let primary_active = self.panels.active(PanelId::Primary);
            if let Some(active) = primary_active {
                if active != TERMINAL_TAB {
                    self.move_tab(active, PanelId::Secondary, true);
                    self.activate_tab(TERMINAL_TAB, PanelId::Primary);
                    self.panels.displaced = Some(active);
                }
            }
        } else {
            for id in self.tabs.ids_in_panel(PanelId::Secondary) {
                self.move_tab(id, PanelId::Primary, false);
            }
            self.panels.set_active(PanelId::Secondary, None);
            self.panels.set_split(false);

            // The displaced tab may have been closed while the split was up.
            if let Some(displaced) = self.panels.displaced.take() {
                self.activate_tab(displaced, PanelId::Primary);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_state;
    use super::*;
    use std::path::Path;

    #[test]
    fn terminal_starts_active_in_primary() {
        let state = test_state();
        assert_eq!(state.panels.active(PanelId::Primary), Some(TERMINAL_TAB));
        assert_eq!(state.panels.active(PanelId::Secondary), None);
        assert!(!state.panels.is_split());
    }

    #[test]
    fn activation_is_rejected_for_the_wrong_panel() {
        let mut state = test_state();
        let (id, _) = state.open_file_tab(Path::new("/w/a.txt"), false);

        assert!(!state.activate_tab(id, PanelId::Secondary));
        assert_eq!(state.panels.active(PanelId::Secondary), None);
        assert!(state.activate_tab(id, PanelId::Primary));
    }

    #[test]
    fn split_on_moves_focused_content_beside_the_terminal() {
        let mut state = test_state();
        let (file, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        assert_eq!(state.panels.active(PanelId::Primary), Some(file));

        state.toggle_split();

        assert!(state.panels.is_split());
        assert_eq!(state.tabs.get(file).unwrap().panel, PanelId::Secondary);
        assert_eq!(state.panels.active(PanelId::Secondary), Some(file));
        assert_eq!(state.panels.active(PanelId::Primary), Some(TERMINAL_TAB));
    }

    #[test]
    fn split_on_with_terminal_focused_moves_nothing() {
        let mut state = test_state();
        let (file, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        state.activate_tab(TERMINAL_TAB, PanelId::Primary);

        state.toggle_split();

        assert_eq!(state.tabs.get(file).unwrap().panel, PanelId::Primary);
        assert!(state.tabs.ids_in_panel(PanelId::Secondary).is_empty());
    }

    #[test]
    fn double_toggle_restores_primary_active_and_empties_secondary() {
        let mut state = test_state();
        let (file, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        assert_eq!(state.panels.active(PanelId::Primary), Some(file));

        state.toggle_split();
        state.toggle_split();

        assert!(!state.panels.is_split());
        assert!(state.tabs.ids_in_panel(PanelId::Secondary).is_empty());
        assert_eq!(state.panels.active(PanelId::Secondary), None);
        assert_eq!(state.panels.active(PanelId::Primary), Some(file));
        assert_eq!(state.tabs.get(file).unwrap().panel, PanelId::Primary);
    }

    #[test]
    fn closing_the_displaced_tab_during_split_falls_back_to_terminal() {
        let mut state = test_state();
        let (file, _) = state.open_file_tab(Path::new("/w/a.txt"), false);

        state.toggle_split();
        state.close_tab(file);
        state.toggle_split();

        assert_eq!(state.panels.active(PanelId::Primary), Some(TERMINAL_TAB));
    }

    #[test]
    fn split_off_returns_all_secondary_tabs() {
        let mut state = test_state();
        let (a, _) = state.open_file_tab(Path::new("/w/a.txt"), false);
        let (b, _) = state.open_file_tab(Path::new("/w/b.txt"), false);
        state.toggle_split();
        state.move_tab(a, PanelId::Secondary, false);
        assert_eq!(state.tabs.ids_in_panel(PanelId::Secondary).len(), 2);

        state.toggle_split();

        assert_eq!(state.tabs.ids_in_panel(PanelId::Primary).len(), 3);
        assert!(state.tabs.ids_in_panel(PanelId::Secondary).is_empty());
        let _ = b;
    }
}
