//! Minimal host pipeline for command reducers.
//!
//! Holds the current state, serializes dispatches, and pumps actions coming
//! back from effects. Any other host works as long as it calls a
//! [`StateReducer`] and feeds a [`Dispatch`] sink.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::dispatch::{ActionReceiver, Dispatch};
use crate::mvi::{Action, StateReducer};

/// Thread-safe state container driven by a pipeline reducer.
pub struct Store<S, A> {
    shared: Arc<Shared<S, A>>,
}

struct Shared<S, A> {
    inner: Mutex<StoreInner<S, A>>,
    revision: watch::Sender<u64>,
}

struct StoreInner<S, A> {
    state: Option<S>,
    reducer: Box<dyn StateReducer<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + 'static,
    A: Action,
{
    /// Create a store. `preloaded` is the state the first dispatch starts
    /// from; `None` lets the reducers initialize it.
    pub fn new<R>(reducer: R, preloaded: Option<S>) -> Self
    where
        R: StateReducer<S, A> + 'static,
    {
        let (revision, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(StoreInner {
                    state: preloaded,
                    reducer: Box::new(reducer),
                }),
                revision,
            }),
        }
    }

    /// Reduce one action.
    ///
    /// Dispatches are serialized. If the reducer panics the panic reaches
    /// the caller and the previous state is kept.
    pub fn dispatch(&self, action: A) {
        let _span = tracing::debug_span!("dispatch", kind = ?action.kind()).entered();
        {
            let mut inner = self.shared.inner.lock();
            let prev = inner.state.clone();
            let next = inner.reducer.reduce(prev, &action);
            inner.state = next;
        }
        self.shared.revision.send_modify(|rev| *rev += 1);
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Option<S> {
        self.shared.inner.lock().state.clone()
    }

    /// Read the current state without cloning it.
    pub fn with_state<T>(&self, f: impl FnOnce(Option<&S>) -> T) -> T {
        f(self.shared.inner.lock().state.as_ref())
    }

    /// Install a new pipeline reducer. The current state is kept.
    pub fn replace_reducer<R>(&self, reducer: R)
    where
        R: StateReducer<S, A> + 'static,
    {
        self.shared.inner.lock().reducer = Box::new(reducer);
        tracing::debug!("Store reducer replaced");
    }

    /// Number of dispatches reduced so far.
    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    /// Change notifications: the value is the revision after each dispatch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Dispatch sink that feeds this store without keeping it alive.
    ///
    /// The store owns its reducer, which owns the dispatcher, which owns the
    /// sink; a strong handle there would never be freed.
    pub fn sink(&self) -> WeakStore<S, A> {
        WeakStore {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Drain `actions` into [`dispatch`](Self::dispatch) on the ambient
    /// runtime.
    ///
    /// The pump stops once every sender is dropped or the store is gone.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime; use
    /// [`spawn_pump_on`](Self::spawn_pump_on) to pick the runtime.
    pub fn spawn_pump(&self, actions: ActionReceiver<A>) -> JoinHandle<()> {
        self.spawn_pump_on(actions, &Handle::current())
    }

    /// Like [`spawn_pump`](Self::spawn_pump), on `runtime`.
    pub fn spawn_pump_on(
        &self,
        mut actions: ActionReceiver<A>,
        runtime: &Handle,
    ) -> JoinHandle<()> {
        let store = self.sink();
        runtime.spawn(async move {
            while let Some(action) = actions.recv().await {
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.dispatch(action);
            }
            tracing::debug!("Action pump stopped");
        })
    }
}

/// Non-owning handle to a [`Store`], usable as a [`Dispatch`] sink.
pub struct WeakStore<S, A> {
    shared: Weak<Shared<S, A>>,
}

impl<S, A> Clone for WeakStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S, A> WeakStore<S, A> {
    /// The store, if it is still alive.
    pub fn upgrade(&self) -> Option<Store<S, A>> {
        self.shared.upgrade().map(|shared| Store { shared })
    }
}

impl<S, A> Dispatch<A> for WeakStore<S, A>
where
    S: Clone + Send + 'static,
    A: Action,
{
    fn dispatch(&self, action: A) {
        match self.upgrade() {
            Some(store) => store.dispatch(action),
            None => tracing::debug!(kind = ?action.kind(), "Store dropped, action discarded"),
        }
    }
}
