//! Confirm Close All Middleware
//!
//! Swallows `RemoveAllTabs` unless closing every tab at once is allowed in the
//! config. Suppressed actions never reach the reducer.

use crate::actions::{BrowserAction, TabListAction};
use crate::state::BrowserState;
use state_store::{BoxFuture, Middleware, MiddlewareContext, Next};

pub struct ConfirmCloseAllMiddleware {
    allow_close_all: bool,
}

impl ConfirmCloseAllMiddleware {
    pub fn new(allow_close_all: bool) -> Self {
        Self { allow_close_all }
    }
}

impl Middleware<BrowserState, BrowserAction> for ConfirmCloseAllMiddleware {
    fn handle<'a>(
        &'a self,
        context: &'a MiddlewareContext<BrowserState, BrowserAction>,
        next: Next<'a, BrowserState, BrowserAction>,
        action: BrowserAction,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            if action == BrowserAction::TabList(TabListAction::RemoveAllTabs)
                && !self.allow_close_all
            {
                log::info!(
                    "Not closing {} tabs: closing all tabs is disabled",
                    context.state().tabs.len()
                );
                return Ok(());
            }
            Ok(next.run(action).await?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::root_reducer;
    use crate::state::TabSessionState;
    use state_store::Store;
    use state_store::testing::CaptureActionsMiddleware;
    use std::sync::Arc;

    fn with_tabs() -> BrowserState {
        BrowserState {
            tabs: vec![
                TabSessionState::new("a", "https://a.org"),
                TabSessionState::new("b", "https://b.org"),
            ],
            selected_tab_id: Some("a".to_string()),
            ..BrowserState::default()
        }
    }

    #[tokio::test]
    async fn test_close_all_is_suppressed_by_default() {
        let reached_reducer = Arc::new(CaptureActionsMiddleware::<BrowserAction>::new());
        let store: Store<BrowserState, BrowserAction> = Store::new(
            with_tabs(),
            root_reducer(),
            vec![
                Box::new(ConfirmCloseAllMiddleware::new(false)),
                Box::new(reached_reducer.clone()),
            ],
        )
        .unwrap();

        store
            .dispatch(TabListAction::RemoveAllTabs.into())
            .await
            .unwrap();

        assert_eq!(*store.state(), with_tabs());
        assert!(reached_reducer.is_empty());
    }

    #[tokio::test]
    async fn test_close_all_when_allowed() {
        let store: Store<BrowserState, BrowserAction> = Store::new(
            with_tabs(),
            root_reducer(),
            vec![Box::new(ConfirmCloseAllMiddleware::new(true))],
        )
        .unwrap();

        store
            .dispatch(TabListAction::RemoveAllTabs.into())
            .await
            .unwrap();

        assert!(store.state().tabs.is_empty());
        assert_eq!(store.state().selected_tab_id, None);
    }
}
