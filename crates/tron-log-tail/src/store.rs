//! Observable store
//!
//! Holds one state record, applies actions to it through a pure reducer and
//! notifies subscribed listeners after every dispatch. Handles are cheap to
//! clone and all point at the same state, so any number of consumers can
//! read it while only the owning component dispatches.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Pure state transition
pub type Reducer<S, A> = fn(S, &A) -> S;

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Inner<S, A> {
    /// Held from reduce until the last listener returns
    dispatching: Mutex<()>,
    state: Mutex<S>,
    reducer: Reducer<S, A>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
    next_id: AtomicU64,
}

/// Shared state container with listener notification
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*lock(&self.inner.state))
            .finish_non_exhaustive()
    }
}

/// A panicking listener must not take the store down with it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S, A> Store<S, A>
where
    S: Clone + Default,
    A: fmt::Debug,
{
    pub fn new(initial_state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            inner: Arc::new(Inner {
                dispatching: Mutex::new(()),
                state: Mutex::new(initial_state),
                reducer,
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> S {
        lock(&self.inner.state).clone()
    }

    /// Project the current state without cloning all of it
    pub fn select<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&lock(&self.inner.state))
    }

    /// Apply an action, then notify listeners with the new state
    ///
    /// Dispatches are serialized, so listeners see states in the order they
    /// were produced and the last snapshot delivered is the current state.
    /// The state lock is released before listeners run, so a listener may
    /// read from the store (but must not dispatch to it).
    pub fn dispatch(&self, action: A) {
        log::trace!("Action: {:?}", action);
        let _order = lock(&self.inner.dispatching);

        let listeners: Vec<Listener<S>> = lock(&self.inner.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        let snapshot = {
            let mut state = lock(&self.inner.state);
            let current = std::mem::take(&mut *state);
            *state = (self.inner.reducer)(current, &action);
            (!listeners.is_empty()).then(|| state.clone())
        };

        if let Some(snapshot) = snapshot {
            for listener in listeners {
                listener(&snapshot);
            }
        }
    }

    /// Register a listener called after every dispatch
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns whether it was registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.inner.listeners);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Start an operation that must settle with exactly one action
    ///
    /// Dispatches `started` now. If the returned guard is dropped without
    /// [`InFlight::settle`] being called (the future owning it was
    /// cancelled), `aborted` is dispatched instead.
    pub fn begin(&self, started: A, aborted: A) -> InFlight<'_, S, A> {
        self.dispatch(started);
        InFlight {
            store: self,
            aborted: Some(aborted),
        }
    }
}

/// Guard for an operation started with [`Store::begin`]
#[must_use = "dropping the guard immediately aborts the operation"]
pub struct InFlight<'a, S, A>
where
    S: Clone + Default,
    A: fmt::Debug,
{
    store: &'a Store<S, A>,
    aborted: Option<A>,
}

impl<S, A> InFlight<'_, S, A>
where
    S: Clone + Default,
    A: fmt::Debug,
{
    /// Finish the operation with its outcome action
    pub fn settle(mut self, outcome: A) {
        self.aborted = None;
        self.store.dispatch(outcome);
    }
}

impl<S, A> Drop for InFlight<'_, S, A>
where
    S: Clone + Default,
    A: fmt::Debug,
{
    fn drop(&mut self) {
        if let Some(aborted) = self.aborted.take() {
            log::debug!("Operation dropped before settling: {:?}", aborted);
            self.store.dispatch(aborted);
        }
    }
}
