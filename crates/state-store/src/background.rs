//! Background worker that processes actions through the middleware chain
//!
//! Every store owns exactly one worker task. It is the single writer of the
//! store's state:
//! - actions arrive over an unbounded FIFO channel from any thread
//! - each action runs through the whole chain, including time spent suspended
//!   inside middleware, before the next one starts
//! - actions dispatched from within the chain are queued behind the current one
//!
//! Reducers therefore never nest and never race.

use crate::action::Action;
use crate::config::{ShutdownPolicy, StoreConfig};
use crate::dispatcher::{Dispatcher, Envelope, Message};
use crate::error::{Result, StoreError, panic_message};
use crate::middleware::{Link, Middleware, MiddlewareContext};
use crate::reducer::Reducer;
use crate::state::State;
use futures::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// The current state plus the reducer that replaces it
///
/// Only the worker (through the innermost chain link) writes to it. Readers
/// clone the `Arc` out of the watch channel, so a snapshot is never torn.
pub(crate) struct StateCell<S, A> {
    reducer: Arc<dyn Reducer<S, A>>,
    state: watch::Sender<Arc<S>>,
}

impl<S, A> StateCell<S, A> {
    pub(crate) fn current(&self) -> Arc<S> {
        self.state.borrow().clone()
    }
}

impl<S: State, A: Action> StateCell<S, A> {
    /// Apply the reducer and install the result
    ///
    /// Subscribers are only woken when the new state differs from the current
    /// one. A panicking reducer leaves the current state in place.
    pub(crate) fn reduce(&self, action: &A) -> Result<()> {
        let current = self.current();
        let reduced = panic::catch_unwind(AssertUnwindSafe(|| {
            self.reducer.reduce(S::clone(&current), action)
        }))
        .map_err(|payload| StoreError::ReducerPanicked(panic_message(payload)))?;

        if reduced != *current {
            self.state.send_replace(Arc::new(reduced));
        } else {
            log::trace!("Reducer left state unchanged for {:?}", action);
        }
        Ok(())
    }
}

pub(crate) struct Worker<S, A> {
    name: String,
    policy: ShutdownPolicy,
    cell: Arc<StateCell<S, A>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    chain: Option<Link<S, A>>,
    dispatcher: Dispatcher<A>,
    rx: mpsc::UnboundedReceiver<Message<A>>,
}

/// Spawn the worker for a new store
///
/// - `rx`: receives everything dispatched through `dispatcher` and its clones
/// - `dispatcher`: cloned into every middleware context for re-entrant dispatch
/// - `state`: sender side of the store's state channel; dropped when the worker stops
pub(crate) fn spawn_background_worker<S: State, A: Action>(
    runtime: &tokio::runtime::Handle,
    config: &StoreConfig,
    state: watch::Sender<Arc<S>>,
    reducer: Arc<dyn Reducer<S, A>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
    dispatcher: Dispatcher<A>,
    rx: mpsc::UnboundedReceiver<Message<A>>,
) {
    let worker = Worker {
        name: config.name.clone(),
        policy: config.shutdown,
        cell: Arc::new(StateCell { reducer, state }),
        middleware,
        chain: None,
        dispatcher,
        rx,
    };
    runtime.spawn(worker.run());
}

impl<S: State, A: Action> Worker<S, A> {
    async fn run(mut self) {
        log::info!("Store '{}' worker started", self.name);
        let mut acks: Vec<oneshot::Sender<()>> = Vec::new();

        while let Some(message) = self.rx.recv().await {
            match message {
                Message::Dispatch(envelope) => {
                    if self.discarding() {
                        log::debug!(
                            "Store '{}': discarding {:?} after shutdown",
                            self.name,
                            envelope.action
                        );
                        continue;
                    }
                    self.process(envelope).await;
                }
                Message::Shutdown(ack) => {
                    log::debug!("Store '{}' received shutdown request", self.name);
                    acks.push(ack);
                    break;
                }
            }
        }

        if self.policy == ShutdownPolicy::Drain {
            // Re-entrant dispatches of drained actions were queued behind the
            // shutdown request; finish them so their parents' handles complete.
            while let Ok(message) = self.rx.try_recv() {
                match message {
                    Message::Dispatch(envelope) => self.process(envelope).await,
                    Message::Shutdown(ack) => acks.push(ack),
                }
            }
        }

        let name = std::mem::take(&mut self.name);
        // Dropping the worker drops the state sender (ending every observer) and
        // settles any envelope still queued as ShutDown.
        drop(self);
        log::info!("Store '{}' worker stopped", name);

        for ack in acks {
            let _ = ack.send(());
        }
    }

    fn discarding(&self) -> bool {
        self.policy == ShutdownPolicy::Discard && self.dispatcher.is_closed()
    }

    async fn process(&mut self, envelope: Envelope<A>) {
        let Envelope { action, lineage } = envelope;
        log::trace!("Store '{}' processing {:?}", self.name, action);

        let chain = self.chain.get_or_insert_with(|| {
            let chain = Link::compile(std::mem::take(&mut self.middleware));
            log::debug!(
                "Store '{}' compiled chain with {} middleware",
                self.name,
                chain.depth()
            );
            chain
        });

        let context =
            MiddlewareContext::new(self.cell.clone(), self.dispatcher.reentrant(&lineage));
        let result = match AssertUnwindSafe(chain.invoke(&context, action))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(StoreError::MiddlewarePanicked(panic_message(payload))),
        };

        if let Err(e) = &result {
            log::warn!("Store '{}': action failed: {}", self.name, e);
        }
        lineage.finish(result);
    }
}
