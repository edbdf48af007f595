use crate::action::Action;
use crate::background::StateCell;
use crate::dispatcher::{DispatchHandle, Dispatcher};
use std::sync::Arc;

/// What a middleware can see and do while handling one action
pub struct MiddlewareContext<S, A> {
    cell: Arc<StateCell<S, A>>,
    dispatcher: Dispatcher<A>,
}

impl<S, A> MiddlewareContext<S, A> {
    pub(crate) fn new(cell: Arc<StateCell<S, A>>, dispatcher: Dispatcher<A>) -> Self {
        Self { cell, dispatcher }
    }

    pub(crate) fn cell(&self) -> &StateCell<S, A> {
        &self.cell
    }

    /// The current state
    ///
    /// This is live: after `next.run(..)` returns it reflects the reduced state.
    pub fn state(&self) -> Arc<S> {
        self.cell.current()
    }

    /// A dispatcher linked to the action being handled, for use from spawned tasks
    pub fn dispatcher(&self) -> Dispatcher<A> {
        self.dispatcher.clone()
    }
}

impl<S, A: Action> MiddlewareContext<S, A> {
    /// Queue a follow-up action behind the one being handled
    ///
    /// Do not await the returned handle inside the chain; see
    /// [`DispatchHandle`].
    pub fn dispatch(&self, action: A) -> DispatchHandle {
        self.dispatcher.dispatch(action)
    }
}
