//! Test helpers for code built on top of the store

use crate::action::Action;
use crate::middleware::{BoxFuture, Middleware, MiddlewareContext, Next};
use crate::state::State;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Middleware that records every action passing through it
///
/// Register it wrapped in an `Arc` to keep a handle for assertions:
///
/// ```rust
/// use std::sync::Arc;
/// use state_store::Store;
/// use state_store::testing::CaptureActionsMiddleware;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), state_store::StoreError> {
/// let capture = Arc::new(CaptureActionsMiddleware::<u32>::new());
/// let store: Store<u32, u32> =
///     Store::new(0, |n: u32, delta: &u32| n + delta, vec![Box::new(capture.clone())])?;
///
/// store.dispatch(5).await?;
///
/// assert_eq!(capture.actions(), vec![5]);
/// # Ok(())
/// # }
/// ```
pub struct CaptureActionsMiddleware<A> {
    captured: Mutex<Vec<A>>,
}

impl<A: Clone> CaptureActionsMiddleware<A> {
    pub fn new() -> Self {
        Self {
            captured: Mutex::new(Vec::new()),
        }
    }

    fn captured(&self) -> MutexGuard<'_, Vec<A>> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All actions seen so far, in order
    pub fn actions(&self) -> Vec<A> {
        self.captured().clone()
    }

    pub fn len(&self) -> usize {
        self.captured().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured().is_empty()
    }

    pub fn first(&self) -> Option<A> {
        self.captured().first().cloned()
    }

    pub fn last(&self) -> Option<A> {
        self.captured().last().cloned()
    }

    pub fn find_first(&self, predicate: impl Fn(&A) -> bool) -> Option<A> {
        self.captured().iter().find(|action| predicate(action)).cloned()
    }

    pub fn find_last(&self, predicate: impl Fn(&A) -> bool) -> Option<A> {
        self.captured()
            .iter()
            .rev()
            .find(|action| predicate(action))
            .cloned()
    }

    pub fn count(&self, predicate: impl Fn(&A) -> bool) -> usize {
        self.captured()
            .iter()
            .filter(|action| predicate(action))
            .count()
    }

    /// Panics unless at least one captured action matches
    #[track_caller]
    pub fn assert_dispatched(&self, predicate: impl Fn(&A) -> bool)
    where
        A: std::fmt::Debug,
    {
        if self.find_first(&predicate).is_none() {
            panic!(
                "no matching action was dispatched; captured: {:?}",
                self.actions()
            );
        }
    }

    /// Panics if any captured action matches
    #[track_caller]
    pub fn assert_not_dispatched(&self, predicate: impl Fn(&A) -> bool)
    where
        A: std::fmt::Debug,
    {
        if let Some(action) = self.find_first(&predicate) {
            panic!("unexpected action was dispatched: {:?}", action);
        }
    }

    /// Forget everything captured so far
    pub fn reset(&self) {
        self.captured().clear();
    }
}

impl<A: Clone> Default for CaptureActionsMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action> Middleware<S, A> for CaptureActionsMiddleware<A> {
    fn handle<'a>(
        &'a self,
        _context: &'a MiddlewareContext<S, A>,
        next: Next<'a, S, A>,
        action: A,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        self.captured().push(action.clone());
        Box::pin(async move { Ok(next.run(action).await?) })
    }
}
