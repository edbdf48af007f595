//! Serialized state container with a middleware pipeline
//!
//! A [`Store`] holds one immutable state snapshot. Every change is requested by
//! dispatching an [`Action`]; the action travels through the registered
//! [`Middleware`] and finally a pure [`Reducer`] that computes the next state.
//!
//! Actions are processed strictly one at a time, in dispatch order, on a
//! background task. Middleware may suspend while handling an action; the next
//! action only starts once the whole chain is done with the current one.
//! Consumers read the state synchronously with [`Store::state`], reactively with
//! [`Store::observe`], or through callbacks bound to a [`Scope`] with
//! [`Store::subscribe`].

mod action;
mod background;
pub mod config;
mod dispatcher;
pub mod error;
pub mod middleware;
mod observe;
mod reducer;
mod state;
mod store;
mod subscription;
pub mod testing;

pub use action::Action;
pub use config::{ShutdownPolicy, StoreConfig};
pub use dispatcher::{DispatchHandle, Dispatcher};
pub use error::{ConfigError, Result, StoreError};
pub use middleware::{BoxFuture, LoggingMiddleware, Middleware, MiddlewareContext, Next};
pub use observe::{IfChanged, StateStreamExt};
pub use reducer::{CombinedReducer, Reducer, combine_reducers};
pub use state::State;
pub use store::Store;
pub use subscription::{Scope, Subscription};
