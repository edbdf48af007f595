//! Dispatcher for queueing actions into a store
//!
//! Every action enters the store through a [`Dispatcher`]. Actions are appended to
//! an unbounded FIFO channel that feeds the store's background worker, so
//! `dispatch` never blocks the caller and never runs the reducer on the caller's
//! stack.
//!
//! Dispatchers handed to middleware are *re-entrant*: actions dispatched through
//! them are linked to the action currently being processed, so the handle of the
//! original dispatch only completes once those follow-ups have been applied too.

use crate::action::Action;
use crate::error::{Result, StoreError};
use std::future::Future;
use std::iter;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot, watch};

/// Messages consumed by the background worker
pub(crate) enum Message<A> {
    Dispatch(Envelope<A>),
    Shutdown(oneshot::Sender<()>),
}

/// An action travelling through the queue together with its completion bookkeeping
pub(crate) struct Envelope<A> {
    pub(crate) action: A,
    pub(crate) lineage: Lineage,
}

/// Completion state of one dispatch
///
/// `pending` counts the dispatch itself plus every linked follow-up that has not
/// been processed yet. The handle resolves when it drops to zero.
struct Tracker {
    inner: Mutex<TrackerState>,
}

struct TrackerState {
    pending: usize,
    outcome: Option<Result<()>>,
    done: Option<oneshot::Sender<Result<()>>>,
}

impl Tracker {
    fn new(done: oneshot::Sender<Result<()>>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(TrackerState {
                pending: 1,
                outcome: None,
                done: Some(done),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a follow-up; returns false once the dispatch already completed
    fn retain(&self) -> bool {
        let mut state = self.lock();
        if state.done.is_none() {
            return false;
        }
        state.pending += 1;
        true
    }

    fn release(&self, outcome: Option<Result<()>>) {
        let mut state = self.lock();
        if let Some(outcome) = outcome {
            state.outcome = Some(outcome);
        }
        state.pending = state.pending.saturating_sub(1);
        if state.pending == 0 {
            if let Some(done) = state.done.take() {
                let outcome = state.outcome.take().unwrap_or(Ok(()));
                // The caller may have dropped its handle; that is fine.
                let _ = done.send(outcome);
            }
        }
    }
}

/// Bookkeeping carried by an [`Envelope`]
///
/// Dropping a lineage settles it: an envelope that is dropped without being
/// processed (discarded on shutdown, channel closed) reports
/// [`StoreError::ShutDown`].
pub(crate) struct Lineage {
    own: Arc<Tracker>,
    ancestors: Vec<Arc<Tracker>>,
    outcome: Option<Result<()>>,
    in_flight: Arc<watch::Sender<usize>>,
}

impl Lineage {
    /// Settle with the result of processing the action
    pub(crate) fn finish(mut self, result: Result<()>) {
        self.outcome = Some(result);
    }

    fn trackers(&self) -> Vec<Arc<Tracker>> {
        iter::once(&self.own)
            .chain(self.ancestors.iter())
            .cloned()
            .collect()
    }
}

impl Drop for Lineage {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(Err(StoreError::ShutDown));
        self.own.release(Some(outcome));
        for ancestor in &self.ancestors {
            ancestor.release(None);
        }
        self.in_flight.send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Handle returned by every dispatch
///
/// Await it to wait until the action, and every follow-up its middleware
/// dispatched while it was being processed, has been applied. Dropping the
/// handle does not cancel the dispatch.
///
/// Never await the handle of a re-entrant dispatch from inside the middleware
/// chain: the follow-up is queued behind the action currently being processed,
/// so awaiting it there can never complete. Spawn a task instead.
#[derive(Debug)]
pub struct DispatchHandle {
    rx: oneshot::Receiver<Result<()>>,
}

impl DispatchHandle {
    fn settled(result: Result<()>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Block the current (non-async) thread until the dispatch completes
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context; await
    /// the handle there instead.
    pub fn join_blocking(self) -> Result<()> {
        self.rx
            .blocking_recv()
            .unwrap_or(Err(StoreError::ShutDown))
    }
}

impl Future for DispatchHandle {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(StoreError::ShutDown)))
    }
}

/// Queues actions into a store
///
/// Cheap to clone. A clone taken from a
/// [`MiddlewareContext`](crate::MiddlewareContext) stays linked to the action
/// being processed when it was taken; use it to dispatch results of delayed work
/// from spawned tasks.
pub struct Dispatcher<A> {
    tx: mpsc::UnboundedSender<Message<A>>,
    in_flight: Arc<watch::Sender<usize>>,
    closed: Arc<AtomicBool>,
    lineage: Vec<Arc<Tracker>>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            in_flight: self.in_flight.clone(),
            closed: self.closed.clone(),
            lineage: self.lineage.clone(),
        }
    }
}

impl<A> Dispatcher<A> {
    /// Create a dispatcher feeding the given worker channel
    pub(crate) fn new(tx: mpsc::UnboundedSender<Message<A>>) -> Self {
        let (in_flight, _) = watch::channel(0);
        Self {
            tx,
            in_flight: Arc::new(in_flight),
            closed: Arc::new(AtomicBool::new(false)),
            lineage: Vec::new(),
        }
    }

    /// Dispatcher whose actions are linked to the envelope being processed
    pub(crate) fn reentrant(&self, lineage: &Lineage) -> Self {
        Self {
            lineage: lineage.trackers(),
            ..self.clone()
        }
    }

    /// Whether this dispatcher was handed out from within the middleware chain
    pub fn is_reentrant(&self) -> bool {
        !self.lineage.is_empty()
    }

    /// Whether the store stopped accepting new dispatches
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of dispatched actions that have not been settled yet
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    pub(crate) fn watch_in_flight(&self) -> watch::Receiver<usize> {
        self.in_flight.subscribe()
    }

    /// Stop accepting external dispatches and ask the worker to stop
    ///
    /// The returned receiver resolves (with either value) once the worker is gone.
    pub(crate) fn request_shutdown(&self) -> oneshot::Receiver<()> {
        self.closed.store(true, Ordering::SeqCst);
        let (ack, done) = oneshot::channel();
        if self.tx.send(Message::Shutdown(ack)).is_err() {
            log::debug!("Dispatcher: store worker already stopped");
        }
        done
    }
}

impl<A: Action> Dispatcher<A> {
    /// Queue an action behind everything dispatched before it
    ///
    /// Returns immediately. Once the store is closed, external dispatches resolve
    /// to [`StoreError::ShutDown`] without being queued; re-entrant dispatches are
    /// still accepted so in-flight work can drain.
    pub fn dispatch(&self, action: A) -> DispatchHandle {
        if !self.is_reentrant() && self.is_closed() {
            log::debug!("Dispatcher: rejecting {:?}, store is shut down", action);
            return DispatchHandle::settled(Err(StoreError::ShutDown));
        }

        let (done, rx) = oneshot::channel();
        let ancestors = self
            .lineage
            .iter()
            .filter(|tracker| tracker.retain())
            .cloned()
            .collect();

        self.in_flight.send_modify(|count| *count += 1);
        let envelope = Envelope {
            action,
            lineage: Lineage {
                own: Tracker::new(done),
                ancestors,
                outcome: None,
                in_flight: self.in_flight.clone(),
            },
        };

        // On failure the returned envelope is dropped, which settles it as ShutDown
        if let Err(mpsc::error::SendError(Message::Dispatch(envelope))) =
            self.tx.send(Message::Dispatch(envelope))
        {
            log::error!(
                "Dispatcher: failed to queue {:?}, store worker is gone",
                envelope.action
            );
        }

        DispatchHandle { rx }
    }
}
