use serde::Serialize;

/// A single open tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabSessionState {
    pub id: String,
    pub url: String,
    pub title: String,
}

impl TabSessionState {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: id.into(),
            title: url.clone(),
            url,
        }
    }
}

/// A configured search engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEngine {
    pub id: String,
    pub name: String,
    pub url_template: String,
}

/// Search engine state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub engines: Vec<SearchEngine>,
    pub default_engine_id: Option<String>,
}

/// Browser state - the single source of truth held by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrowserState {
    pub tabs: Vec<TabSessionState>,
    pub selected_tab_id: Option<String>,
    pub search: SearchState,
}

impl BrowserState {
    pub fn find_tab(&self, tab_id: &str) -> Option<&TabSessionState> {
        self.tabs.iter().find(|tab| tab.id == tab_id)
    }

    pub fn selected_tab(&self) -> Option<&TabSessionState> {
        self.selected_tab_id
            .as_deref()
            .and_then(|tab_id| self.find_tab(tab_id))
    }
}
