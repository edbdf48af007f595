//! Middleware system
//!
//! Middleware sits between action dispatch and reducer execution, allowing side
//! effects, async operations, logging and other cross-cutting concerns to be
//! handled in a composable way.
//!
//! ## Design
//!
//! ```text
//! dispatch → middleware[0] → middleware[1] → … → reducer → state → subscribers
//! ```
//!
//! Each middleware receives the [`MiddlewareContext`], a [`Next`] continuation
//! and the action. It can:
//! - forward the action with `next.run(action)`
//! - drop it by never calling `next`
//! - replace it by calling `next` with a different action
//! - fan it out by calling `next` several times
//! - suspend (await I/O) before or after calling `next`
//! - dispatch follow-up actions through `context.dispatch(..)`, which are queued
//!   behind the current action
//!
//! The middleware registered first wraps everything registered after it, so it
//! sees every action first and can veto everything downstream.
//!
//! ## Example
//!
//! ```rust
//! use state_store::{BoxFuture, Middleware, MiddlewareContext, Next};
//!
//! #[derive(Debug, Clone)]
//! enum TabAction {
//!     AddTab(String),
//!     RemoveAllTabs,
//! }
//!
//! struct KeepTabsMiddleware;
//!
//! impl Middleware<Vec<String>, TabAction> for KeepTabsMiddleware {
//!     fn handle<'a>(
//!         &'a self,
//!         _context: &'a MiddlewareContext<Vec<String>, TabAction>,
//!         next: Next<'a, Vec<String>, TabAction>,
//!         action: TabAction,
//!     ) -> BoxFuture<'a, anyhow::Result<()>> {
//!         Box::pin(async move {
//!             match action {
//!                 // Swallowed: the reducer never sees it
//!                 TabAction::RemoveAllTabs => Ok(()),
//!                 other => Ok(next.run(other).await?),
//!             }
//!         })
//!     }
//! }
//! ```

mod chain;
mod context;
pub mod logging;

pub use chain::Next;
pub(crate) use chain::Link;
pub use context::MiddlewareContext;
pub use logging::LoggingMiddleware;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// BoxFuture type alias for async middleware handlers
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Intercepts actions before they reach the reducer
///
/// Middleware runs on the store's background worker, one action at a time.
/// Private fields are not synchronized by the store: use interior mutability
/// (atomics, mutexes) for any state shared with spawned tasks.
///
/// A middleware must not hold on to the state it reads past the call; newer
/// state may already be installed when delayed work resumes. Read
/// [`MiddlewareContext::state`] again instead.
pub trait Middleware<S, A>: Send + Sync {
    /// Handle an action
    ///
    /// - `context`: read-only access to the live state plus re-entrant dispatch
    /// - `next`: continuation into the rest of the chain and finally the reducer
    /// - `action`: the action being dispatched
    ///
    /// Returning an error aborts the action; the error is reported through its
    /// dispatch handle.
    fn handle<'a>(
        &'a self,
        context: &'a MiddlewareContext<S, A>,
        next: Next<'a, S, A>,
        action: A,
    ) -> BoxFuture<'a, anyhow::Result<()>>;
}

/// Lets callers keep a handle on a registered middleware (e.g. for assertions)
impl<S, A, M> Middleware<S, A> for Arc<M>
where
    M: Middleware<S, A> + ?Sized,
{
    fn handle<'a>(
        &'a self,
        context: &'a MiddlewareContext<S, A>,
        next: Next<'a, S, A>,
        action: A,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        (**self).handle(context, next, action)
    }
}
