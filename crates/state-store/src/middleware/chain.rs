//! The compiled middleware chain

use super::{BoxFuture, Middleware, MiddlewareContext};
use crate::action::Action;
use crate::error::{Result, StoreError};
use crate::state::State;

/// One link of the compiled chain
///
/// The innermost link applies the reducer and installs the new state; every
/// middleware wraps the link compiled before it.
pub(crate) enum Link<S, A> {
    Reduce,
    Intercept {
        middleware: Box<dyn Middleware<S, A>>,
        next: Box<Link<S, A>>,
    },
}

impl<S, A> Link<S, A> {
    /// Wrap the middleware around the reducer in reverse registration order,
    /// so `middleware[0]` becomes the outermost link.
    pub(crate) fn compile(middleware: Vec<Box<dyn Middleware<S, A>>>) -> Self {
        middleware
            .into_iter()
            .rev()
            .fold(Link::Reduce, |next, middleware| Link::Intercept {
                middleware,
                next: Box::new(next),
            })
    }

    pub(crate) fn depth(&self) -> usize {
        match self {
            Link::Reduce => 0,
            Link::Intercept { next, .. } => 1 + next.depth(),
        }
    }
}

impl<S: State, A: Action> Link<S, A> {
    pub(crate) fn invoke<'a>(
        &'a self,
        context: &'a MiddlewareContext<S, A>,
        action: A,
    ) -> BoxFuture<'a, Result<()>> {
        match self {
            Link::Reduce => Box::pin(async move { context.cell().reduce(&action) }),
            Link::Intercept { middleware, next } => {
                let next = Next {
                    link: next.as_ref(),
                    context,
                };
                Box::pin(async move {
                    middleware
                        .handle(context, next, action)
                        .await
                        .map_err(StoreError::from_middleware)
                })
            }
        }
    }
}

/// Continuation into the rest of the chain
///
/// Calling [`Next::run`] hands an action to the next middleware, or to the
/// reducer when this is the innermost middleware. It can be called any number
/// of times, including not at all.
pub struct Next<'a, S, A> {
    link: &'a Link<S, A>,
    context: &'a MiddlewareContext<S, A>,
}

impl<S, A> Clone for Next<'_, S, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, A> Copy for Next<'_, S, A> {}

impl<'a, S: State, A: Action> Next<'a, S, A> {
    /// Pass an action further down the chain
    ///
    /// Resolves once the downstream middleware and the reducer are done with it.
    pub fn run(&self, action: A) -> BoxFuture<'a, Result<()>> {
        self.link.invoke(self.context, action)
    }
}
