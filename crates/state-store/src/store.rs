use crate::action::Action;
use crate::background::spawn_background_worker;
use crate::config::StoreConfig;
use crate::dispatcher::{DispatchHandle, Dispatcher};
use crate::error::{Result, StoreError};
use crate::middleware::Middleware;
use crate::reducer::Reducer;
use crate::state::State;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

/// Redux-style store that holds state and serializes every change to it
///
/// The store follows the Redux pattern:
/// - one immutable state snapshot, replaced on every accepted action
/// - actions are dispatched to request changes
/// - pure reducers compute the next state
/// - middleware intercepts actions on their way to the reducer
///
/// All processing happens on a background task spawned on the tokio runtime the
/// store was created in. `Store` is a cheap handle; clones share the same state
/// and queue. When the last handle is dropped the store shuts down following
/// its [`ShutdownPolicy`](crate::ShutdownPolicy).
///
/// ```rust
/// use state_store::{LoggingMiddleware, Store};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), state_store::StoreError> {
/// let store: Store<i64, i64> = Store::new(
///     0,
///     |count: i64, delta: &i64| count + delta,
///     vec![Box::new(LoggingMiddleware::default())],
/// )?;
///
/// store.dispatch(2);
/// store.dispatch(3).await?;
/// assert_eq!(*store.state(), 5);
/// # Ok(())
/// # }
/// ```
pub struct Store<S, A> {
    pub(crate) inner: Arc<StoreInner<S, A>>,
}

pub(crate) struct StoreInner<S, A> {
    pub(crate) name: String,
    pub(crate) runtime: Handle,
    pub(crate) dispatcher: Dispatcher<A>,
    pub(crate) state: watch::Receiver<Arc<S>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: State, A: Action> Store<S, A> {
    /// Create a store with default configuration
    ///
    /// Middleware sees actions in the order given: `middleware[0]` first.
    /// Fails with [`StoreError::NoRuntime`] outside of a tokio runtime.
    pub fn new<R>(
        initial_state: S,
        reducer: R,
        middleware: Vec<Box<dyn Middleware<S, A>>>,
    ) -> Result<Self>
    where
        R: Reducer<S, A> + 'static,
    {
        Self::with_config(StoreConfig::default(), initial_state, reducer, middleware)
    }

    pub fn with_config<R>(
        config: StoreConfig,
        initial_state: S,
        reducer: R,
        middleware: Vec<Box<dyn Middleware<S, A>>>,
    ) -> Result<Self>
    where
        R: Reducer<S, A> + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        let (state_tx, state_rx) = watch::channel(Arc::new(initial_state));
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(action_tx);

        log::debug!(
            "Creating store '{}' with {} middleware ({:?} on shutdown)",
            config.name,
            middleware.len(),
            config.shutdown
        );
        spawn_background_worker(
            &runtime,
            &config,
            state_tx,
            Arc::new(reducer),
            middleware,
            dispatcher.clone(),
            action_rx,
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                name: config.name,
                runtime,
                dispatcher,
                state: state_rx,
            }),
        })
    }

    /// Dispatch an action through the middleware chain and reducer
    ///
    /// Returns immediately; await the handle to wait for the action (and the
    /// follow-ups its middleware dispatched) to be applied.
    pub fn dispatch(&self, action: A) -> DispatchHandle {
        self.inner.dispatcher.dispatch(action)
    }
}

impl<S, A> Store<S, A> {
    /// Current state snapshot
    pub fn state(&self) -> Arc<S> {
        self.inner.state.borrow().clone()
    }

    /// Get a dispatcher for collaborators that should not hold the whole store
    pub fn dispatcher(&self) -> Dispatcher<A> {
        self.inner.dispatcher.clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Wait until every dispatched action, including re-entrant follow-ups,
    /// has been processed
    pub async fn wait_until_idle(&self) {
        let mut in_flight = self.inner.dispatcher.watch_in_flight();
        // The sender lives as long as `self`, so this only returns once idle
        let _ = in_flight.wait_for(|count| *count == 0).await;
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.dispatcher.is_closed()
    }

    /// Tear the store down
    ///
    /// New external dispatches are rejected from the moment this is called.
    /// Queued actions are drained or discarded according to the configured
    /// [`ShutdownPolicy`](crate::ShutdownPolicy). The returned future resolves
    /// once the worker has stopped; at that point every observation stream has
    /// ended and every subscription has been released.
    pub fn shutdown(&self) -> impl Future<Output = ()> + Send + use<S, A> {
        log::debug!("Shutdown requested for store '{}'", self.inner.name);
        let stopped = self.inner.dispatcher.request_shutdown();
        async move {
            let _ = stopped.await;
        }
    }
}

impl<S, A> Drop for StoreInner<S, A> {
    fn drop(&mut self) {
        if !self.dispatcher.is_closed() {
            log::debug!("Last handle to store '{}' dropped, shutting down", self.name);
            drop(self.dispatcher.request_shutdown());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct CounterState {
        count: i32,
    }

    #[derive(Debug, Clone)]
    enum CounterAction {
        Increment,
        Reset,
    }

    fn reduce(mut state: CounterState, action: &CounterAction) -> CounterState {
        match action {
            CounterAction::Increment => state.count += 1,
            CounterAction::Reset => state.count = 0,
        }
        state
    }

    fn store() -> Store<CounterState, CounterAction> {
        Store::new(CounterState::default(), reduce, Vec::new()).unwrap()
    }

    #[tokio::test]
    async fn test_store_dispatch_increment() {
        let store = store();
        assert_eq!(store.state().count, 0);

        store.dispatch(CounterAction::Increment).await.unwrap();
        assert_eq!(store.state().count, 1);
    }

    #[tokio::test]
    async fn test_store_dispatch_without_waiting() {
        let store = store();

        store.dispatch(CounterAction::Increment);
        store.dispatch(CounterAction::Increment);
        store.dispatch(CounterAction::Reset);
        store.dispatch(CounterAction::Increment);
        store.wait_until_idle().await;

        assert_eq!(store.state().count, 1);
        assert_eq!(store.dispatcher().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = store();
        let other = store.clone();

        other.dispatch(CounterAction::Increment).await.unwrap();

        assert_eq!(store.state().count, 1);
        assert_eq!(store.name(), "store");
    }

    #[test]
    fn test_store_requires_runtime() {
        let result = Store::new(CounterState::default(), reduce, Vec::new());

        assert!(matches!(result, Err(StoreError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_dispatch_after_shutdown_is_rejected() {
        let store = store();
        store.dispatch(CounterAction::Increment);

        store.shutdown().await;

        assert!(store.is_shut_down());
        assert_eq!(store.state().count, 1);
        assert!(matches!(
            store.dispatch(CounterAction::Increment).await,
            Err(StoreError::ShutDown)
        ));
    }
}
