//! Scoped subscriptions
//!
//! A [`Scope`] stands in for whatever owns a subscription (a screen, a
//! feature, a request). Subscriptions created in a scope deliver state on
//! their own task until the scope is cancelled or dropped; after that no
//! further notifications are delivered, even for actions still in flight.
//! Cancelling one subscription never affects the store or other subscribers.

use crate::error::panic_message;
use crate::state::State;
use crate::store::Store;
use futures::stream::BoxStream;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifetime of a group of subscriptions
///
/// Cancelled explicitly with [`Scope::cancel`] or implicitly when dropped.
#[derive(Debug, Default)]
pub struct Scope {
    token: CancellationToken,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A nested scope, cancelled together with this one
    pub fn child(&self) -> Scope {
        Scope {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

struct Control {
    paused: AtomicBool,
    resumed: Notify,
}

/// Handle to a running subscription
///
/// Dropping the handle does not end the subscription; its scope does, or
/// [`Subscription::unsubscribe`].
#[derive(Clone)]
pub struct Subscription {
    token: CancellationToken,
    control: Arc<Control>,
}

impl Subscription {
    /// Stop delivering states; nothing is delivered after this returns
    pub fn unsubscribe(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Suspend delivery; state changes while paused are not delivered
    pub fn pause(&self) {
        self.control.paused.store(true, Ordering::SeqCst);
    }

    /// Resume delivery, starting with the current state
    pub fn resume(&self) {
        self.control.paused.store(false, Ordering::SeqCst);
        self.control.resumed.notify_one();
    }

    pub fn is_paused(&self) -> bool {
        self.control.paused.load(Ordering::SeqCst)
    }
}

impl<S: State, A> Store<S, A> {
    /// Deliver the current state and every subsequent state to `observer` until
    /// `scope` ends
    ///
    /// The observer runs on its own task: a slow observer is conflated to the
    /// latest state and never holds up the store. A panicking observer ends
    /// only its own subscription.
    pub fn subscribe<F>(&self, scope: &Scope, observer: F) -> Subscription
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.spawn_subscription(scope.token.child_token(), observer)
    }

    /// Like [`Store::subscribe`] without a scope; only
    /// [`Subscription::unsubscribe`] or store shutdown ends it
    pub fn subscribe_manually<F>(&self, observer: F) -> Subscription
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.spawn_subscription(CancellationToken::new(), observer)
    }

    /// Run `block` with a stream of state snapshots until `scope` ends
    ///
    /// The block is dropped as soon as the scope is cancelled.
    pub fn observe_scoped<F, Fut>(&self, scope: &Scope, block: F) -> JoinHandle<()>
    where
        F: FnOnce(BoxStream<'static, Arc<S>>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = scope.token.child_token();
        let consumer = block(self.states());
        self.inner.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {}
                _ = consumer => {}
            }
        })
    }

    fn spawn_subscription<F>(&self, token: CancellationToken, observer: F) -> Subscription
    where
        F: FnMut(&S) + Send + 'static,
    {
        let control = Arc::new(Control {
            paused: AtomicBool::new(false),
            resumed: Notify::new(),
        });
        let subscription = Subscription {
            token: token.clone(),
            control: control.clone(),
        };
        let name = self.inner.name.clone();
        self.inner.runtime.spawn(deliver(
            name,
            self.inner.state.clone(),
            token,
            control,
            observer,
        ));
        subscription
    }
}

async fn deliver<S, F>(
    name: String,
    mut states: watch::Receiver<Arc<S>>,
    token: CancellationToken,
    control: Arc<Control>,
    mut observer: F,
) where
    S: State,
    F: FnMut(&S) + Send + 'static,
{
    loop {
        if !control.paused.load(Ordering::SeqCst) {
            let state = states.borrow_and_update().clone();
            if token.is_cancelled() {
                break;
            }
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| observer(&state))) {
                log::error!(
                    "Store '{}': subscriber panicked, cancelling subscription: {}",
                    name,
                    panic_message(payload)
                );
                token.cancel();
                break;
            }
        } else {
            // Skipped while paused; resume delivers the latest state
            states.mark_unchanged();
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = control.resumed.notified() => {}
            changed = states.changed() => {
                if changed.is_err() {
                    // Store shut down
                    break;
                }
            }
        }
    }
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropping_scope_cancels_children() {
        let scope = Scope::new();
        let child = scope.child();
        let token = child.token.clone();

        drop(scope);

        assert!(child.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancelling_child_leaves_parent_alive() {
        let scope = Scope::new();
        let child = scope.child();

        child.cancel();

        assert!(child.is_cancelled());
        assert!(!scope.is_cancelled());
    }
}
