//! Reactive observation of store state
//!
//! [`Store::observe`] turns the store into a lazy stream of projections. The
//! stream starts with the current projection and then yields once per installed
//! state. A consumer that falls behind is conflated: it skips superseded states
//! and resumes with the latest one, but never sees states out of order.
//!
//! Combine it with [`StateStreamExt::if_changed`] to only wake up when the part
//! of the state a consumer cares about actually changed:
//!
//! ```rust
//! use futures::StreamExt;
//! use state_store::{StateStreamExt, Store};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), state_store::StoreError> {
//! let store: Store<u32, u32> = Store::new(0, |n: u32, delta: &u32| n + delta, Vec::new())?;
//!
//! // Only wakes up when the count crosses a multiple of ten
//! let mut tens = store.observe(|n| *n / 10).if_changed(|tens| *tens);
//! assert_eq!(tens.next().await, Some(0));
//!
//! store.dispatch(4);
//! store.dispatch(7).await?;
//! assert_eq!(tens.next().await, Some(1));
//! # Ok(())
//! # }
//! ```

use crate::state::State;
use crate::store::Store;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use tokio::sync::watch;

impl<S: State, A> Store<S, A> {
    /// Stream of projections of the state
    ///
    /// Lazy: nothing is read until the stream is polled. Every call returns an
    /// independent stream starting from the current state. The stream only ends
    /// when the store shuts down.
    pub fn observe<R, F>(&self, projection: F) -> BoxStream<'static, R>
    where
        F: Fn(&S) -> R + Send + 'static,
        R: Send + 'static,
    {
        project(self.inner.state.clone(), move |state: &Arc<S>| {
            projection(state.as_ref())
        })
    }

    /// Stream of full state snapshots
    pub fn states(&self) -> BoxStream<'static, Arc<S>> {
        project(self.inner.state.clone(), |state: &Arc<S>| state.clone())
    }
}

fn project<S, R, F>(receiver: watch::Receiver<Arc<S>>, projection: F) -> BoxStream<'static, R>
where
    S: State,
    R: Send + 'static,
    F: Fn(&Arc<S>) -> R + Send + 'static,
{
    stream::unfold(
        (receiver, projection, true),
        |(mut receiver, projection, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            // Release the channel lock before running user code
            let state = receiver.borrow_and_update().clone();
            let value = projection(&state);
            Some((value, (receiver, projection, false)))
        },
    )
    .boxed()
}

/// Stream combinators for observed state
pub trait StateStreamExt: Stream + Sized {
    /// Skip items whose key equals the key of the previously emitted item
    ///
    /// The first item is always emitted. Intermediate items that map to the same
    /// key are dropped, so a consumer only wakes up for meaningful changes.
    fn if_changed<K, F>(self, compare_by: F) -> IfChanged<Self, F, K>
    where
        F: FnMut(&Self::Item) -> K,
        K: PartialEq,
    {
        IfChanged {
            stream: self,
            compare_by,
            last: None,
        }
    }
}

impl<T: Stream> StateStreamExt for T {}

/// Stream returned by [`StateStreamExt::if_changed`]
#[must_use = "streams do nothing unless polled"]
pub struct IfChanged<St, F, K> {
    stream: St,
    compare_by: F,
    last: Option<K>,
}

impl<St, F, K> Stream for IfChanged<St, F, K>
where
    St: Stream + Unpin,
    F: FnMut(&St::Item) -> K + Unpin,
    K: PartialEq + Unpin,
{
    type Item = St::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let Some(item) = ready!(this.stream.poll_next_unpin(cx)) else {
                return Poll::Ready(None);
            };
            let key = (this.compare_by)(&item);
            if this.last.as_ref() != Some(&key) {
                this.last = Some(key);
                return Poll::Ready(Some(item));
            }
        }
    }
}
