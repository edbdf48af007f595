use crate::actions::{BrowserAction, SearchAction};
use crate::state::SearchState;

/// Reducer for search engine state
pub fn reduce(mut state: SearchState, action: &BrowserAction) -> SearchState {
    let BrowserAction::Search(action) = action else {
        return state;
    };

    match action {
        SearchAction::AddSearchEngine(engine) => {
            if state.default_engine_id.is_none() {
                state.default_engine_id = Some(engine.id.clone());
            }
            state.engines.retain(|existing| existing.id != engine.id);
            state.engines.push(engine.clone());
        }
        SearchAction::RemoveSearchEngine { engine_id } => {
            state.engines.retain(|engine| &engine.id != engine_id);
            if state.default_engine_id.as_ref() == Some(engine_id) {
                state.default_engine_id = state.engines.first().map(|engine| engine.id.clone());
            }
        }
        SearchAction::SetDefaultSearchEngine { engine_id } => {
            if state.engines.iter().any(|engine| &engine.id == engine_id) {
                state.default_engine_id = Some(engine_id.clone());
            }
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SearchEngine;

    fn engine(id: &str) -> SearchEngine {
        SearchEngine {
            id: id.to_string(),
            name: id.to_uppercase(),
            url_template: format!("https://{id}.example/?q={{searchTerms}}"),
        }
    }

    #[test]
    fn test_first_engine_becomes_default() {
        let state = reduce(
            SearchState::default(),
            &SearchAction::AddSearchEngine(engine("ddg")).into(),
        );
        let state = reduce(state, &SearchAction::AddSearchEngine(engine("wiki")).into());

        assert_eq!(state.engines.len(), 2);
        assert_eq!(state.default_engine_id.as_deref(), Some("ddg"));
    }

    #[test]
    fn test_removing_default_engine_falls_back() {
        let state = reduce(
            SearchState::default(),
            &SearchAction::AddSearchEngine(engine("ddg")).into(),
        );
        let state = reduce(state, &SearchAction::AddSearchEngine(engine("wiki")).into());

        let state = reduce(
            state,
            &SearchAction::RemoveSearchEngine {
                engine_id: "ddg".to_string(),
            }
            .into(),
        );

        assert_eq!(state.default_engine_id.as_deref(), Some("wiki"));
    }

    #[test]
    fn test_unknown_default_engine_is_ignored() {
        let state = reduce(
            SearchState::default(),
            &SearchAction::AddSearchEngine(engine("ddg")).into(),
        );

        let state = reduce(
            state,
            &SearchAction::SetDefaultSearchEngine {
                engine_id: "missing".to_string(),
            }
            .into(),
        );

        assert_eq!(state.default_engine_id.as_deref(), Some("ddg"));
    }
}
