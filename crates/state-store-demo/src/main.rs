use futures::StreamExt;
use state_store::{LoggingMiddleware, Scope, StateStreamExt, Store};

mod actions;
mod config;
mod logger;
mod middleware;
mod reducer;
mod reducers;
mod state;

use actions::{BrowserAction, SearchAction, TabListAction};
use config::DemoConfig;
use middleware::{ConfirmCloseAllMiddleware, TabsRemovedMiddleware};
use state::{BrowserState, SearchEngine, TabSessionState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    log::info!("Starting state-store-demo");

    let config = DemoConfig::load();

    // Middleware sees actions in this order
    let store: Store<BrowserState, BrowserAction> = Store::with_config(
        config.store.clone(),
        BrowserState::default(),
        reducer::root_reducer(),
        vec![
            Box::new(LoggingMiddleware::new(config.store.name.clone())),
            Box::new(ConfirmCloseAllMiddleware::new(config.allow_close_all)),
            Box::new(TabsRemovedMiddleware::new()),
        ],
    )?;

    let scope = Scope::new();
    let selection = store.observe_scoped(&scope, |states| async move {
        let mut selected = states
            .map(|state| state.selected_tab_id.clone())
            .if_changed(|tab_id| tab_id.clone());
        while let Some(tab_id) = selected.next().await {
            match tab_id {
                Some(tab_id) => log::info!("Selected tab: {}", tab_id),
                None => log::info!("No tab selected"),
            }
        }
    });

    for (id, url) in [
        ("mozilla", "https://www.mozilla.org"),
        ("rust", "https://www.rust-lang.org"),
        ("crates", "https://crates.io"),
    ] {
        store.dispatch(
            TabListAction::AddTab {
                tab: TabSessionState::new(id, url),
                select: false,
            }
            .into(),
        );
    }
    for (id, name, url_template) in [
        ("ddg", "DuckDuckGo", "https://duckduckgo.com/?q={searchTerms}"),
        (
            "wikipedia",
            "Wikipedia",
            "https://en.wikipedia.org/wiki/Special:Search?search={searchTerms}",
        ),
        ("mdn", "MDN Web Docs", "https://developer.mozilla.org/search?q={searchTerms}"),
    ] {
        store.dispatch(
            SearchAction::AddSearchEngine(SearchEngine {
                id: id.to_string(),
                name: name.to_string(),
                url_template: url_template.to_string(),
            })
            .into(),
        );
    }
    store.dispatch(
        SearchAction::SetDefaultSearchEngine {
            engine_id: "wikipedia".to_string(),
        }
        .into(),
    );
    store.dispatch(
        SearchAction::RemoveSearchEngine {
            engine_id: "mdn".to_string(),
        }
        .into(),
    );
    store.dispatch(
        TabListAction::UpdateTitle {
            tab_id: "rust".to_string(),
            title: "Rust Programming Language".to_string(),
        }
        .into(),
    );

    // Removing the selected tab makes the middleware select its neighbor
    store
        .dispatch(
            TabListAction::RemoveTab {
                tab_id: "mozilla".to_string(),
            }
            .into(),
        )
        .await?;

    store.dispatch(TabListAction::RemoveAllTabs.into()).await?;
    store.wait_until_idle().await;

    let final_state = store.state();
    if let Some(tab) = final_state.selected_tab() {
        log::info!("Ended on '{}' ({})", tab.title, tab.url);
    }
    println!("{}", serde_json::to_string_pretty(&*final_state)?);

    scope.cancel();
    selection.await?;
    store.shutdown().await;

    log::info!("Exiting state-store-demo");
    Ok(())
}
