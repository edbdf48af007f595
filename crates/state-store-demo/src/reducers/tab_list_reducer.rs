use crate::actions::{BrowserAction, TabListAction};
use crate::state::BrowserState;

/// Reducer for the tab list and selection
///
/// Removing the selected tab clears the selection; picking a replacement is up
/// to [`TabsRemovedMiddleware`](crate::middleware::TabsRemovedMiddleware).
pub fn reduce(mut state: BrowserState, action: &BrowserAction) -> BrowserState {
    let BrowserAction::TabList(action) = action else {
        return state;
    };

    match action {
        TabListAction::AddTab { tab, select } => {
            // Tab ids are unique
            if state.find_tab(&tab.id).is_some() {
                return state;
            }
            if *select || state.selected_tab_id.is_none() {
                state.selected_tab_id = Some(tab.id.clone());
            }
            state.tabs.push(tab.clone());
        }
        TabListAction::SelectTab { tab_id } => {
            if state.find_tab(tab_id).is_some() {
                state.selected_tab_id = Some(tab_id.clone());
            }
        }
        TabListAction::RemoveTab { tab_id } => {
            state.tabs.retain(|tab| &tab.id != tab_id);
            if state.selected_tab_id.as_ref() == Some(tab_id) {
                state.selected_tab_id = None;
            }
        }
        TabListAction::RemoveAllTabs => {
            state.tabs.clear();
            state.selected_tab_id = None;
        }
        TabListAction::UpdateTitle { tab_id, title } => {
            if let Some(tab) = state.tabs.iter_mut().find(|tab| &tab.id == tab_id) {
                tab.title = title.clone();
            }
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TabSessionState;

    fn add(state: BrowserState, id: &str, select: bool) -> BrowserState {
        let tab = TabSessionState::new(id, format!("https://{id}.org"));
        reduce(state, &TabListAction::AddTab { tab, select }.into())
    }

    #[test]
    fn test_first_tab_is_selected() {
        let state = add(BrowserState::default(), "a", false);
        let state = add(state, "b", false);

        assert_eq!(state.tabs.len(), 2);
        assert_eq!(state.selected_tab_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_add_with_select() {
        let state = add(BrowserState::default(), "a", false);
        let state = add(state, "b", true);

        assert_eq!(state.selected_tab().map(|tab| tab.id.as_str()), Some("b"));
    }

    #[test]
    fn test_duplicate_tab_is_ignored() {
        let state = add(BrowserState::default(), "a", false);
        let state = add(state, "a", true);

        assert_eq!(state.tabs.len(), 1);
    }

    #[test]
    fn test_removing_selected_tab_clears_selection() {
        let state = add(BrowserState::default(), "a", false);
        let state = add(state, "b", false);

        let state = reduce(
            state,
            &TabListAction::RemoveTab {
                tab_id: "a".to_string(),
            }
            .into(),
        );

        assert_eq!(state.tabs.len(), 1);
        assert_eq!(state.selected_tab_id, None);
    }

    #[test]
    fn test_select_unknown_tab_is_ignored() {
        let state = add(BrowserState::default(), "a", false);

        let state = reduce(
            state,
            &TabListAction::SelectTab {
                tab_id: "missing".to_string(),
            }
            .into(),
        );

        assert_eq!(state.selected_tab_id.as_deref(), Some("a"));
    }
}
