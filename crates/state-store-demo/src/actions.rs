use crate::state::{SearchEngine, TabSessionState};

/// Actions represent all possible state changes of the browser store.
/// Actions are grouped by the slice of state they affect.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowserAction {
    TabList(TabListAction),
    Search(SearchAction),
}

/// Tab list actions
#[derive(Debug, Clone, PartialEq)]
pub enum TabListAction {
    /// Append a tab, optionally making it the selected one
    AddTab { tab: TabSessionState, select: bool },
    SelectTab { tab_id: String },
    RemoveTab { tab_id: String },
    RemoveAllTabs,
    UpdateTitle { tab_id: String, title: String },
}

/// Search engine actions
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    AddSearchEngine(SearchEngine),
    RemoveSearchEngine { engine_id: String },
    SetDefaultSearchEngine { engine_id: String },
}

impl From<TabListAction> for BrowserAction {
    fn from(action: TabListAction) -> Self {
        BrowserAction::TabList(action)
    }
}

impl From<SearchAction> for BrowserAction {
    fn from(action: SearchAction) -> Self {
        BrowserAction::Search(action)
    }
}
