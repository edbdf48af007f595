use crate::actions::BrowserAction;
use crate::reducers::{search_reducer, tab_list_reducer};
use crate::state::BrowserState;
use state_store::CombinedReducer;

/// Root reducer: every slice reducer in turn, each seeing the previous one's output
pub fn root_reducer() -> CombinedReducer<BrowserState, BrowserAction> {
    CombinedReducer::new()
        .with(tab_list_reducer::reduce)
        .with(reduce_search)
}

fn reduce_search(mut state: BrowserState, action: &BrowserAction) -> BrowserState {
    state.search = search_reducer::reduce(state.search, action);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{SearchAction, TabListAction};
    use crate::state::{SearchEngine, TabSessionState};
    use state_store::Reducer;

    #[test]
    fn test_root_reducer_routes_to_slices() {
        let reducer = root_reducer();

        let state = reducer.reduce(
            BrowserState::default(),
            &TabListAction::AddTab {
                tab: TabSessionState::new("a", "https://a.org"),
                select: false,
            }
            .into(),
        );
        let state = reducer.reduce(
            state,
            &SearchAction::AddSearchEngine(SearchEngine {
                id: "ddg".to_string(),
                name: "DuckDuckGo".to_string(),
                url_template: "https://duckduckgo.com/?q={searchTerms}".to_string(),
            })
            .into(),
        );

        assert_eq!(state.tabs.len(), 1);
        assert_eq!(state.search.default_engine_id.as_deref(), Some("ddg"));
    }
}
