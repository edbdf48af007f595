//! Tabs Removed Middleware
//!
//! When the selected tab is removed the tab list reducer clears the selection.
//! This middleware then dispatches a `SelectTab` for the tab that took its
//! place, or the one before it when the last tab was removed.

use crate::actions::{BrowserAction, TabListAction};
use crate::state::{BrowserState, TabSessionState};
use state_store::{BoxFuture, Middleware, MiddlewareContext, Next};

pub struct TabsRemovedMiddleware;

impl TabsRemovedMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TabsRemovedMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware<BrowserState, BrowserAction> for TabsRemovedMiddleware {
    fn handle<'a>(
        &'a self,
        context: &'a MiddlewareContext<BrowserState, BrowserAction>,
        next: Next<'a, BrowserState, BrowserAction>,
        action: BrowserAction,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            let BrowserAction::TabList(TabListAction::RemoveTab { tab_id }) = &action else {
                return Ok(next.run(action).await?);
            };
            let tab_id = tab_id.clone();

            let before = context.state();
            let was_selected = before.selected_tab_id.as_deref() == Some(tab_id.as_str());
            let position = before.tabs.iter().position(|tab| tab.id == tab_id);

            next.run(action).await?;

            if !was_selected {
                return Ok(());
            }
            let after = context.state();
            if let Some(replacement) = position.and_then(|index| neighbor(&after.tabs, index)) {
                log::debug!(
                    "Selected tab {} removed, selecting {}",
                    tab_id,
                    replacement.id
                );
                context.dispatch(
                    TabListAction::SelectTab {
                        tab_id: replacement.id.clone(),
                    }
                    .into(),
                );
            }
            Ok(())
        })
    }
}

/// The tab now at `index`, or the one before it
fn neighbor(tabs: &[TabSessionState], index: usize) -> Option<&TabSessionState> {
    tabs.get(index)
        .or_else(|| index.checked_sub(1).and_then(|index| tabs.get(index)))
}
